use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::application::services::{parse_search_filters, validate_search_request};
use crate::domain::{CallerId, RetrievedPassage};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::dispatcher::decode_payload;
use crate::presentation::envelope::ApiResponse;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::{audit_outcome, now_timestamp, to_body};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchRequest {
    query: Option<String>,
    filters: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    query: String,
    results: Vec<RetrievedPassage>,
    timestamp: String,
}

#[instrument(skip(state, caller, body))]
pub async fn handle_search(
    state: &AppState,
    caller: Option<&CallerId>,
    body: Value,
) -> Result<ApiResponse, ApiError> {
    let request: SearchRequest = decode_payload(body)?;
    let query = validate_search_request(request.query.as_deref())?;
    let filters = parse_search_filters(request.filters.as_ref())?;

    tracing::debug!(
        query = %sanitize_prompt(&query),
        filter_count = filters.len(),
        "Searching knowledge base"
    );

    let results = state
        .inference_service
        .search_knowledge_base(&query, filters)
        .await?;

    audit_outcome(
        "search_query",
        state
            .audit_logger
            .log_search_query(caller, &query, results.len())
            .await,
    );

    let response = SearchResponse {
        query,
        results,
        timestamp: now_timestamp(),
    };

    Ok(ApiResponse::ok(to_body(&response)?))
}
