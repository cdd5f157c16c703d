//! Unified error handling for the admin panel.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::AdminApiError;
use crate::services::images::UploadError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Adoption backend call failed.
    #[error("API error: {0}")]
    Api(#[from] AdminApiError),

    /// Image host upload failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        let is_server_error = matches!(
            &self,
            Self::Internal(_)
                | Self::Upload(_)
                | Self::Api(
                    AdminApiError::Http(_)
                        | AdminApiError::Parse(_)
                        | AdminApiError::Status(_)
                        | AdminApiError::MissingData(_)
                )
        );
        if is_server_error {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Api(err) => match err {
                AdminApiError::Rejected(_) => StatusCode::BAD_REQUEST,
                AdminApiError::Banned { .. } => StatusCode::FORBIDDEN,
                AdminApiError::NotFound(_) => StatusCode::NOT_FOUND,
                AdminApiError::Http(_)
                | AdminApiError::Parse(_)
                | AdminApiError::Status(_)
                | AdminApiError::MissingData(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Upload(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Api(err) => err.user_message(),
            Self::Upload(_) => "Image upload failed. Please try again.".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
