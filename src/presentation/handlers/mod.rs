mod analyze;
mod chat;
mod gateway;
mod health;
mod history;
mod search;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::MetadataStoreError;

use super::error::ApiError;

pub use analyze::handle_analyze;
pub use chat::handle_chat;
pub use gateway::{AUTHORIZER_SUBJECT_HEADER, direct_handler, invocation_handler};
pub use health::health_handler;
pub use history::handle_history;
pub use search::handle_search;

/// Audit writes never change the response; a failed write is only logged.
fn audit_outcome<T>(record_kind: &'static str, outcome: Result<T, MetadataStoreError>) {
    if let Err(e) = outcome {
        tracing::warn!(record = record_kind, error = %e, "Audit write failed");
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_body<T: Serialize>(response: &T) -> Result<Value, ApiError> {
    serde_json::to_value(response)
        .map_err(|e| ApiError::internal_with("Error serializing response", e))
}
