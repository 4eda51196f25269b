use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::application::services::{validate_chat_request, validate_conversation_id};
use crate::domain::{
    CallerId, ChatMessage, ConversationId, MessageRole, ModelParameterOverrides, TokenUsage,
};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::dispatcher::decode_payload;
use crate::presentation::envelope::ApiResponse;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::{audit_outcome, to_body};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    parameters: Option<ModelParameterOverrides>,
    use_agent: bool,
    conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponse {
    content: String,
    usage: TokenUsage,
    model: String,
    conversation_id: ConversationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<Value>>,
}

#[instrument(skip(state, caller, body))]
pub async fn handle_chat(
    state: &AppState,
    caller: Option<&CallerId>,
    body: Value,
) -> Result<ApiResponse, ApiError> {
    let request: ChatRequest = decode_payload(body)?;
    let parameters = validate_chat_request(&request.messages, request.parameters.as_ref())?;

    let conversation_id = validate_conversation_id(request.conversation_id.as_deref())?
        .unwrap_or_else(ConversationId::generate);

    let latest = request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or_default();
    tracing::debug!(
        conversation_id = %conversation_id,
        prompt = %sanitize_prompt(latest),
        "Processing chat request"
    );

    audit_outcome(
        "conversation_turn",
        state
            .audit_logger
            .log_conversation_turn(caller, &conversation_id, MessageRole::User, latest)
            .await,
    );

    let use_agent = request.use_agent && state.inference_service.agent_available();
    let result = if use_agent {
        state
            .inference_service
            .invoke_agent(&request.messages, Some(conversation_id.as_str()))
            .await?
    } else {
        state
            .inference_service
            .invoke_model(&request.messages, &parameters)
            .await?
    };

    audit_outcome(
        "conversation_turn",
        state
            .audit_logger
            .log_conversation_turn(caller, &conversation_id, MessageRole::Assistant, &result.text)
            .await,
    );

    let response = ChatResponse {
        content: result.text,
        usage: result.usage,
        model: result.model_identifier,
        conversation_id,
        session_id: result.session_id,
        sources: use_agent.then_some(result.citations),
    };

    Ok(ApiResponse::ok(to_body(&response)?))
}
