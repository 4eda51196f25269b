use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use serde_json::json;

use crate::domain::CallerId;
use crate::presentation::dispatcher::dispatch;
use crate::presentation::envelope::{ApiResponse, GatewayEvent, GatewayResponse, InboundRequest};
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

/// Header carrying the verified subject claim on direct HTTP calls.
pub const AUTHORIZER_SUBJECT_HEADER: &str = "x-authorizer-sub";

/// `POST /invocations`: one gateway proxy event in, one proxy response out.
#[tracing::instrument(skip(state, payload))]
pub async fn invocation_handler(
    State(state): State<AppState>,
    payload: Bytes,
) -> Json<GatewayResponse> {
    let response = match serde_json::from_slice::<GatewayEvent>(&payload) {
        Ok(event) => dispatch(&state, event.into_inbound()).await,
        Err(_) => ApiError::MalformedBody.into_api_response(),
    };

    Json(GatewayResponse::from(response))
}

/// Any other path: the request itself is the event.
#[tracing::instrument(skip(state, headers, body), fields(path = %uri.path()))]
pub async fn direct_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    if method == Method::OPTIONS {
        return ApiResponse::new(StatusCode::OK, json!({}));
    }

    let caller = CallerId::from_claim(
        headers
            .get(AUTHORIZER_SUBJECT_HEADER)
            .and_then(|v| v.to_str().ok()),
    );
    let body = if body.is_empty() {
        None
    } else {
        match String::from_utf8(body.to_vec()) {
            Ok(text) => Some(text),
            Err(_) => return ApiError::MalformedBody.into_api_response(),
        }
    };

    let request = InboundRequest {
        http_method: method.to_string(),
        path: uri.path().to_string(),
        body,
        caller,
    };

    dispatch(&state, request).await
}
