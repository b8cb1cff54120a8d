//! HTTP-facing error taxonomy.
//!
//! Everything the caller can fix (bad body shape, wrong file type, unknown
//! sheet or column, invalid operation, unreadable file path) renders as a
//! 400 with a `{"error": "..."}` body; everything else is a 500 with the
//! same shape.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::report::{AssembleError, ReportError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be parsed into the expected shape
    #[error("{0}")]
    BadRequestShape(String),

    /// Upload filename does not carry the workbook extension
    #[error("Invalid file type")]
    UnsupportedFileType,

    /// Caller-supplied workbook path could not be opened
    #[error("{0}")]
    Workbook(String),

    /// Domain failure from evaluation or assembly
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Anything that is not the caller's fault
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequestShape(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<AssembleError> for ApiError {
    fn from(err: AssembleError) -> Self {
        match err {
            AssembleError::Report(e) => ApiError::Report(e),
            AssembleError::Workbook(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            log::error!("request failed: {}", message);
        } else {
            log::debug!("rejected request: {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
