//! Error types for the document query service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors, each mapped to a distinct HTTP status
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request validation failure (missing field, empty query, empty file)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Vector index missing, unloadable, or inconsistent with the embedder
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// External call exceeded its deadline
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// Upload ledger error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg.clone()),
            Error::FileParse { filename, message } => (
                StatusCode::BAD_REQUEST,
                "parse_error",
                format!("Failed to parse '{}': {}", filename, message),
            ),
            Error::IndexUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "index_unavailable", msg.clone())
            }
            Error::Embedding(msg) => (StatusCode::BAD_GATEWAY, "embedding_error", msg.clone()),
            Error::Llm(msg) => (StatusCode::BAD_GATEWAY, "llm_error", msg.clone()),
            Error::Timeout(what) => (
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                format!("Timed out waiting for {}", what),
            ),
            Error::Storage(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "json_error",
                err.to_string(),
            ),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::invalid_input("empty query"), StatusCode::BAD_REQUEST),
            (
                Error::file_parse("a.pdf", "bad xref"),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::IndexUnavailable("missing".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (Error::embedding("down"), StatusCode::BAD_GATEWAY),
            (Error::llm("down"), StatusCode::BAD_GATEWAY),
            (
                Error::Timeout("ollama generate".into()),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (Error::internal("oops"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_parse_error_includes_filename() {
        let err = Error::file_parse("report.pdf", "truncated stream");
        assert!(err.to_string().contains("report.pdf"));
        assert!(err.to_string().contains("truncated stream"));
    }
}
