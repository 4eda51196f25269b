mod agent_runtime;
mod content_store;
mod inference_error;
mod metadata_store;
mod model_runtime;
mod rate_limiter;

pub use agent_runtime::{AgentInvocation, AgentReply, AgentRuntime, RetrievalRequest};
pub use content_store::{ContentStore, ContentStoreError, StoredObject};
pub use inference_error::InferenceError;
pub use metadata_store::{Item, ItemKey, MetadataStore, MetadataStoreError};
pub use model_runtime::{ContentBlock, ModelInvocation, ModelReply, ModelRuntime};
pub use rate_limiter::RateLimiter;
