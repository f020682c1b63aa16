use crate::constants::MAX_BODY_BYTES;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller sent missing fields or the wrong images.
    #[error("{0}")]
    Validation(String),

    /// The upstream call failed, timed out or returned something unusable.
    #[error("{message}")]
    Upstream { message: String, details: Value },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        RelayError::Validation(message.into())
    }

    pub fn upstream(message: impl Into<String>, details: Value) -> Self {
        RelayError::Upstream {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { .. } | RelayError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Upstream request timed out"
        } else {
            "Upstream request failed"
        };
        RelayError::upstream(message, Value::String(err.to_string()))
    }
}

impl From<axum::extract::multipart::MultipartError> for RelayError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return RelayError::Validation(format!(
                "Request body exceeds the {} MiB limit",
                MAX_BODY_BYTES / (1024 * 1024)
            ));
        }
        RelayError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<axum::extract::multipart::MultipartRejection> for RelayError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        RelayError::Validation(rejection.body_text())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            RelayError::Validation(message) => json!({ "error": message }),
            RelayError::Upstream { message, details } => {
                log::error!("{}: {}", message, details);
                json!({ "error": message, "details": details })
            }
            RelayError::Configuration(message) => {
                log::error!("configuration error: {}", message);
                json!({ "error": "Server misconfigured", "details": message })
            }
        };
        (status, Json(body)).into_response()
    }
}
