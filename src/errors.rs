use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Everything that can abort a registry lookup.
///
/// Unresolved fields are not errors; they fall back to defaults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Identifier is not 10 or 12 ASCII digits.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// Provisioning key or URL template absent or malformed.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),
    /// Connection failure, timeout or non-success HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Response body is not JSON.
    #[error("Parse error: {0}")]
    Parse(String),
    /// Provider reported a failure and returned no body.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl IntoResponse for AppError {
    /// Maps each error to a status code and a JSON body.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidIdentifier(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MissingConfiguration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service misconfigured".to_string(),
                )
            }
            AppError::Transport(_) | AppError::Parse(_) => {
                tracing::error!("Registry API error: {}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "External service error".to_string(),
                )
            }
            AppError::Provider(msg) => {
                tracing::warn!("Registry provider rejected request: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
