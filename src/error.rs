//! Application error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors raised while configuring the gateway or serving a request
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Uploaded text is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Uploaded file is not a valid image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("No healthy endpoints available: {0}")]
    NoHealthyBackends(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Only request validation failures describe themselves to the caller
        let detail = match &self {
            AppError::InvalidRequest(message) | AppError::PayloadTooLarge(message) => message.clone(),
            other => {
                error!(error = %other, "Request failed");
                "Internal Server Error".to_string()
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
