pub mod llm;
pub mod observability;
pub mod persistence;
pub mod rate_limit;
pub mod storage;
