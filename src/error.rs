//! Error types surfaced to operators.
//!
//! Only two things can go wrong with an import: the text is not JSON, or it is JSON
//! without `themes` / `sentiment_overall`. Everything else renders best-effort.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Rejection of a submitted document. The active report is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid JSON format: {0}")]
    MalformedInput(String),

    #[error("Invalid Narrative Schema V2.0: Missing themes or sentiment_overall.")]
    SchemaViolation,
}

impl SchemaError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::MalformedInput(_) => "malformed_input",
            SchemaError::SchemaViolation => "schema_violation",
        }
    }
}

/// Standard error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Layout config could not be re-read (500)
    #[error("Config reload failed: {0}")]
    Config(String),

    /// Report was replaced on every settle attempt (409)
    #[error("Report changed while the tension graph was settling; retry")]
    Superseded,

    /// Blocking settle task panicked or was cancelled (500)
    #[error("Settle worker failed: {0}")]
    Worker(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Schema(_) => StatusCode::BAD_REQUEST,
            ApiError::Superseded => StatusCode::CONFLICT,
            ApiError::Config(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Schema(e) => e.code(),
            ApiError::Config(_) => "config_error",
            ApiError::Superseded => "superseded",
            ApiError::Worker(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "request failed");
        } else {
            tracing::warn!(error = %self, code = self.code(), "request rejected");
        }
        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
