use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::application::services::validate_history_request;
use crate::domain::{CallerId, ConversationId, MessageRole};
use crate::presentation::dispatcher::decode_payload;
use crate::presentation::envelope::ApiResponse;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::to_body;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HistoryRequest {
    conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    conversation_id: ConversationId,
    messages: Vec<HistoryMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryMessage {
    message_id: String,
    role: MessageRole,
    content: String,
    timestamp: String,
}

/// Only turns written under the caller's identity are returned.
#[instrument(skip(state, caller, body))]
pub async fn handle_history(
    state: &AppState,
    caller: Option<&CallerId>,
    body: Value,
) -> Result<ApiResponse, ApiError> {
    let request: HistoryRequest = decode_payload(body)?;
    let conversation_id = validate_history_request(request.conversation_id.as_deref())?;

    let turns = state
        .audit_logger
        .conversation_turns(&conversation_id)
        .await
        .map_err(|e| ApiError::internal_with("Error reading conversation history", e))?;

    let messages = turns
        .into_iter()
        .filter(|turn| turn.user_id.as_ref() == caller)
        .map(|turn| HistoryMessage {
            message_id: turn.message_id.to_string(),
            role: turn.role,
            content: turn.content,
            timestamp: turn.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        })
        .collect();

    let response = HistoryResponse {
        conversation_id,
        messages,
    };

    Ok(ApiResponse::ok(to_body(&response)?))
}
