//! Error types for the matching service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the matching service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable storage error (reads degrade locally, writes surface here)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Embedding provider error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Invalid caller input (missing or empty fields)
    #[error("{0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
