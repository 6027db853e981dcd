use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

/// Body of the 400 returned when the `key` parameter is missing or empty
pub const MISSING_FILE_KEY_MESSAGE: &str = "File key is required";

/// Body of the 500 returned for every object store failure
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch scan status from AWS";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File key is required")]
    MissingFileKey,

    #[error("Object store error: {0}")]
    Upstream(#[from] StorageError),
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFileKey => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Upstream detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::MissingFileKey => MISSING_FILE_KEY_MESSAGE,
            AppError::Upstream(_) => UPSTREAM_FAILURE_MESSAGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::MissingFileKey => {
                tracing::debug!("Rejected scan status request without file key");
            }
            AppError::Upstream(err) => {
                tracing::error!(
                    key = %err.key(),
                    code = err.code().unwrap_or("none"),
                    error = %err,
                    "S3 tagging error"
                );
            }
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
