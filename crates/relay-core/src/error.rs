//! Handler-boundary error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_types::{ProviderError, ValidationError};
use serde_json::json;
use thiserror::Error;

/// Everything a request can fail with, converted into `{ "error": ... }`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    /// Caller sent something unusable. 400 (413 for oversized attachments).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Model or file store call failed. 500.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Staging, reading, or removing an attachment failed. 500.
    #[error("Attachment I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(e) => {
                StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST)
            },
            Self::Provider(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Validation(e) => tracing::debug!("Rejected request: {}", e),
            Self::Provider(e) => {
                tracing::error!("Provider call failed (transient={}): {}", e.is_transient(), e)
            },
            Self::Io(e) => tracing::error!("Attachment I/O failed: {}", e),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
