use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use crate::application::services::ValidationError;
use crate::domain::CallerId;

use super::envelope::{ApiResponse, InboundRequest};
use super::error::ApiError;
use super::handlers::{handle_analyze, handle_chat, handle_history, handle_search};
use super::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Chat,
    Analyze,
    Search,
    History,
}

impl Route {
    /// Matches the final path segment exactly: `/prod/ai/chat` is `Chat`,
    /// `/chatty` is nothing.
    pub fn from_path(path: &str) -> Option<Self> {
        let segment = path.trim_end_matches('/').rsplit('/').next()?;
        match segment {
            "chat" => Some(Route::Chat),
            "analyze" => Some(Route::Analyze),
            "search" => Some(Route::Search),
            "history" => Some(Route::History),
            _ => None,
        }
    }

    fn is_rate_limited(&self) -> bool {
        matches!(self, Route::Chat | Route::Analyze)
    }
}

/// Runs one request to completion. Every outcome, including failures, comes
/// back as a response.
#[instrument(skip(state, request), fields(method = %request.http_method, path = %request.path))]
pub async fn dispatch(state: &AppState, request: InboundRequest) -> ApiResponse {
    match route_request(state, request).await {
        Ok(response) => response,
        Err(err) => err.into_api_response(),
    }
}

async fn route_request(state: &AppState, request: InboundRequest) -> Result<ApiResponse, ApiError> {
    let body = parse_body(request.body.as_deref())?;
    let caller = authenticate(state.require_identity, request.caller)?;
    let route = Route::from_path(&request.path).ok_or(ApiError::InvalidEndpoint)?;

    if let Some(caller) = caller.as_ref().filter(|_| route.is_rate_limited()) {
        if !state.rate_limiter.allow(caller).await {
            return Err(ApiError::RateLimited);
        }
    }

    tracing::debug!(?route, caller = ?caller.as_ref().map(CallerId::as_str), "Request routed");

    match route {
        Route::Chat => handle_chat(state, caller.as_ref(), body).await,
        Route::Analyze => handle_analyze(state, caller.as_ref(), body).await,
        Route::Search => handle_search(state, caller.as_ref(), body).await,
        Route::History => handle_history(state, caller.as_ref(), body).await,
    }
}

/// Absent or blank bodies read as `{}`.
fn parse_body(body: Option<&str>) -> Result<Value, ApiError> {
    match body.map(str::trim).filter(|b| !b.is_empty()) {
        None => Ok(Value::Object(Default::default())),
        Some(raw) => serde_json::from_str(raw).map_err(|_| ApiError::MalformedBody),
    }
}

fn authenticate(
    require_identity: bool,
    caller: Option<CallerId>,
) -> Result<Option<CallerId>, ApiError> {
    match caller {
        None if require_identity => Err(ApiError::Unauthorized),
        caller => Ok(caller),
    }
}

/// Decodes a route payload; shape mismatches are client errors.
pub(crate) fn decode_payload<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(ValidationError::MalformedRequest(e.to_string())))
}
