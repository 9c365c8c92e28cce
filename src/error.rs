// src/error.rs
//! Error taxonomy for loading and for the HTTP surface.
//!
//! Matching and classification never fail; everything here belongs either to
//! startup (catalog / rules loading) or to request handling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Failures while loading or validating the answer catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read answer catalog at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed answer catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("answer record #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate answer id `{0}`")]
    DuplicateId(String),

    #[error("answer `{id}` has an empty keyword")]
    EmptyKeyword { id: String },

    #[error("answer `{id}` declares type `{declared}` but carries a `{payload}` payload")]
    PayloadMismatch {
        id: String,
        declared: &'static str,
        payload: &'static str,
    },
}

/// Failures while loading fallback classification rules.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read fallback rules at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fallback rules: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("fallback rule `{0}` has no keywords")]
    EmptyRule(&'static str),

    #[error("fallback rule `{0}` contains an empty keyword")]
    EmptyKeyword(&'static str),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request format: {message}")]
    InvalidRequest {
        message: String,
        details: Vec<String>,
    },

    #[error("Answer `{0}` not found")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::InvalidRequest {
            details: vec![message.clone()],
            message,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::InvalidRequest { details, .. } => {
                metrics::counter!("qa_invalid_requests_total").increment(1);
                json!({
                    "error": "Invalid request format",
                    "details": details,
                })
            }
            ApiError::NotFound(_) => json!({ "error": self.to_string() }),
            ApiError::Internal(detail) => {
                // Details stay in the logs only.
                error!(%detail, "request failed");
                json!({ "error": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
