mod audit_logger;
mod document_accessor;
mod inference_service;
mod prompt_builder;
mod request_validator;

pub use audit_logger::{AuditLogger, conversation_partition};
pub use document_accessor::{DocumentAccessor, document_key};
pub use inference_service::{
    AgentTarget, DEFAULT_ANTHROPIC_VERSION, DEFAULT_MAX_SEARCH_RESULTS, InferenceConfig,
    InferenceService,
};
pub use prompt_builder::build_analysis_prompt;
pub use request_validator::{
    ValidationError, parse_search_filters, validate_analysis_request, validate_chat_request,
    validate_conversation_id, validate_history_request, validate_search_request,
};
