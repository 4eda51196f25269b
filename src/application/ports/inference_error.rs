#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("throttled by upstream service")]
    Throttled,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("agent not configured")]
    AgentNotConfigured,
    #[error("knowledge base not configured")]
    KnowledgeBaseNotConfigured,
}
