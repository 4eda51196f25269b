mod analysis;
mod caller_id;
mod chat_message;
mod conversation_turn;
mod document;
mod inference_result;
mod knowledge_base;
mod model_parameters;
mod search_log;

pub use analysis::{AnalysisId, AnalysisKind, AnalysisOptions, AnalysisRecord};
pub use caller_id::CallerId;
pub use chat_message::{ChatMessage, MessageRole};
pub use conversation_turn::{
    CONVERSATION_TURN_TTL_DAYS, ConversationId, ConversationTurn, MessageId,
};
pub use document::{AccessLevel, DocumentId, DocumentRecord, MediaKind, StorageKey};
pub use inference_result::{InferenceResult, TokenUsage};
pub use knowledge_base::{RetrievalFilter, RetrievedPassage};
pub use model_parameters::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, MAX_MAX_TOKENS, MIN_MAX_TOKENS,
    ModelParameterOverrides, ModelParameters,
};
pub use search_log::{SEARCH_LOG_TTL_DAYS, SearchId, SearchLogEntry};
