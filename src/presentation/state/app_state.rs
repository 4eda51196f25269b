use std::sync::Arc;

use crate::application::ports::RateLimiter;
use crate::application::services::{AuditLogger, DocumentAccessor, InferenceService};

#[derive(Clone)]
pub struct AppState {
    pub inference_service: Arc<InferenceService>,
    pub document_accessor: Arc<DocumentAccessor>,
    pub audit_logger: Arc<AuditLogger>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Reject requests without a caller identity instead of serving them
    /// anonymously.
    pub require_identity: bool,
}
