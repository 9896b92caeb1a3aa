use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;

pub const RESUME_TEXT_REQUIRED: &str = "resume text required";
pub const API_KEY_NOT_CONFIGURED: &str = "API key not configured";
pub const OPTIMIZATION_FAILED: &str = "resume optimization failed, please try again later";
pub const INVALID_REQUEST_BODY: &str = "invalid request body";
pub const INTERNAL_ERROR: &str = "internal server error";
pub const BODY_TOO_LARGE: &str = "request body too large";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`;
/// `status` and `body` let other hosts render the same envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<String>,
    },

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error envelope: `{"error": ..., "details": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    pub fn missing_resume_text() -> Self {
        AppError::Validation {
            message: RESUME_TEXT_REQUIRED.to_string(),
            details: None,
        }
    }

    pub fn invalid_body(details: impl Into<String>) -> Self {
        AppError::Validation {
            message: INVALID_REQUEST_BODY.to_string(),
            details: Some(details.into()),
        }
    }

    pub fn missing_api_key() -> Self {
        AppError::Configuration(API_KEY_NOT_CONFIGURED.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Configuration(_) | AppError::Upstream(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the caller-facing envelope and logs server-side failures.
    /// Upstream detail goes into `details`; the headline stays generic.
    pub fn body(&self) -> ErrorBody {
        match self {
            AppError::Validation { message, details } => ErrorBody {
                error: message.clone(),
                details: details.clone(),
            },
            AppError::PayloadTooLarge { limit } => ErrorBody {
                error: BODY_TOO_LARGE.to_string(),
                details: Some(format!("limit is {limit} bytes")),
            },
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                ErrorBody {
                    error: msg.clone(),
                    details: None,
                }
            }
            AppError::Upstream(e) => {
                tracing::error!("LLM error: {e}");
                ErrorBody {
                    error: OPTIMIZATION_FAILED.to_string(),
                    details: Some(e.to_string()),
                }
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ErrorBody {
                    error: INTERNAL_ERROR.to_string(),
                    details: Some(e.to_string()),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400_without_details() {
        let err = AppError::missing_resume_text();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            serde_json::json!({"error": "resume text required"})
        );
    }

    #[test]
    fn test_configuration_maps_to_500() {
        let err = AppError::missing_api_key();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().error, "API key not configured");
        assert!(err.body().details.is_none());
    }

    #[test]
    fn test_upstream_keeps_generic_message_and_raw_details() {
        let err = AppError::from(LlmError::Api {
            status: 401,
            message: "Authentication Fails".to_string(),
        });
        let body = err.body();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, OPTIMIZATION_FAILED);
        assert_eq!(
            body.details.as_deref(),
            Some("API error (status 401): Authentication Fails")
        );
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let err = AppError::PayloadTooLarge { limit: 1024 };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            serde_json::json!({"error": "request body too large", "details": "limit is 1024 bytes"})
        );
    }

    #[test]
    fn test_invalid_body_carries_parser_details() {
        let err = AppError::invalid_body("expected value at line 1 column 1");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().error, INVALID_REQUEST_BODY);
        assert!(err.body().details.is_some());
    }
}
