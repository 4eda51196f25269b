use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::application::services::{build_analysis_prompt, validate_analysis_request};
use crate::domain::{
    AnalysisId, AnalysisOptions, CallerId, ChatMessage, DocumentId, ModelParameters,
};
use crate::presentation::dispatcher::decode_payload;
use crate::presentation::envelope::ApiResponse;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::{audit_outcome, now_timestamp, to_body};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalyzeRequest {
    document_id: Option<String>,
    options: AnalysisOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    analysis_id: String,
    document_id: DocumentId,
    analysis_type: &'static str,
    result: String,
    timestamp: String,
}

#[instrument(skip(state, caller, body))]
pub async fn handle_analyze(
    state: &AppState,
    caller: Option<&CallerId>,
    body: Value,
) -> Result<ApiResponse, ApiError> {
    let request: AnalyzeRequest = decode_payload(body)?;
    let (document_id, kind) =
        validate_analysis_request(request.document_id.as_deref(), &request.options)?;

    let document = state
        .document_accessor
        .get_metadata(&document_id)
        .await
        .map_err(|e| ApiError::internal_with("Error accessing document metadata", e))?
        .ok_or(ApiError::NotFound("Document not found"))?;

    if !document.is_accessible_by(caller) {
        return Err(ApiError::AccessDenied);
    }

    let content = state
        .document_accessor
        .get_content(&document.storage_key)
        .await
        .ok_or_else(|| ApiError::internal("Error retrieving document content"))?;

    let prompt = build_analysis_prompt(&document, &content, kind, &request.options);
    let result = state
        .inference_service
        .invoke_model(&[ChatMessage::user(prompt)], &ModelParameters::for_analysis())
        .await?;

    let analysis_id = AnalysisId::new();
    audit_outcome(
        "analysis_result",
        state
            .audit_logger
            .log_analysis_result(caller, &document_id, analysis_id, kind, &result)
            .await,
    );

    let response = AnalyzeResponse {
        analysis_id: analysis_id.to_string(),
        document_id,
        analysis_type: kind.as_str(),
        result: result.text,
        timestamp: now_timestamp(),
    };

    Ok(ApiResponse::ok(to_body(&response)?))
}
