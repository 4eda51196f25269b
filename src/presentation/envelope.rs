use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::CallerId;

/// Proxy event as delivered by the upstream gateway.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewayEvent {
    pub http_method: String,
    pub path: String,
    pub body: Option<String>,
    pub request_context: RequestContext,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestContext {
    pub authorizer: Authorizer,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Authorizer {
    pub claims: Claims,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Claims {
    pub sub: Option<String>,
}

impl GatewayEvent {
    pub fn into_inbound(self) -> InboundRequest {
        InboundRequest {
            caller: CallerId::from_claim(self.request_context.authorizer.claims.sub.as_deref()),
            http_method: self.http_method,
            path: self.path,
            body: self.body,
        }
    }
}

/// Transport-neutral request handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub http_method: String,
    pub path: String,
    pub body: Option<String>,
    pub caller: Option<CallerId>,
}

/// Status plus JSON body; rendered either as a gateway envelope or directly
/// as an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

const ENVELOPE_HEADERS: [(&str, &str); 3] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Credentials", "true"),
];

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [
                (CONTENT_TYPE, "application/json"),
                (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"),
            ],
            self.body.to_string(),
        )
            .into_response()
    }
}

/// Gateway proxy response: the body is a JSON document serialized to a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl From<ApiResponse> for GatewayResponse {
    fn from(response: ApiResponse) -> Self {
        Self {
            status_code: response.status.as_u16(),
            headers: ENVELOPE_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            body: response.body.to_string(),
        }
    }
}
