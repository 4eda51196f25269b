use axum::http::StatusCode;
use serde_json::json;
use tracing::{error, warn};

use crate::application::ports::InferenceError;
use crate::application::services::ValidationError;

use super::envelope::ApiResponse;

/// Every failure the router can answer with. Nothing below the presentation
/// layer reaches the transport without passing through here.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid JSON in request body")]
    MalformedBody,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid endpoint")]
    InvalidEndpoint,
    #[error("Access denied to this document")]
    AccessDenied,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("AI service temporarily unavailable")]
    Upstream(#[source] InferenceError),
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn internal(message: &'static str) -> Self {
        Self::Internal {
            message,
            detail: None,
        }
    }

    pub fn internal_with(message: &'static str, detail: impl ToString) -> Self {
        Self::Internal {
            message,
            detail: Some(detail.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody | ApiError::Validation(_) | ApiError::InvalidEndpoint => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_api_response(self) -> ApiResponse {
        let status = self.status();
        match &self {
            ApiError::Upstream(source) => {
                error!(error = %source, "Inference service call failed");
            }
            ApiError::Internal {
                message,
                detail: Some(detail),
            } => {
                error!(error = %detail, "{}", message);
            }
            other => {
                warn!(status = status.as_u16(), reason = %other, "Request rejected");
            }
        }

        let body = match self {
            ApiError::Internal {
                message,
                detail: Some(detail),
            } => json!({ "message": message, "error": detail }),
            other => json!({ "message": other.to_string() }),
        };

        ApiResponse::new(status, body)
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::KnowledgeBaseNotConfigured => {
                ApiError::internal("Knowledge base not configured")
            }
            InferenceError::AgentNotConfigured => ApiError::internal("Agent not configured"),
            other => ApiError::Upstream(other),
        }
    }
}
