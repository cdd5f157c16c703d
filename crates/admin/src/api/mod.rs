//! REST client for the adoption backend's moderation endpoints.
//!
//! Deliberately separate from the site's client: the two binaries consume
//! different endpoint families with different privilege levels, and the
//! split keeps a compromised site process unable to even name the
//! moderation surface.

mod client;
pub mod types;

pub use client::AdminClient;

use pet_haven_core::envelope::Rejection;
use thiserror::Error;

/// Errors that can occur when talking to the adoption backend.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed (connect, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend declined the operation (`success: false`).
    #[error("{0}")]
    Rejected(#[from] Rejection),

    /// The account is banned (HTTP 403 with ban details).
    #[error("account banned: {}", .reason.as_deref().unwrap_or("no reason recorded"))]
    Banned {
        /// Reason recorded by the moderator, when one exists.
        reason: Option<String>,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend returned a non-success status with no envelope.
    #[error("Backend returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The envelope was successful but the expected payload was absent.
    #[error("missing {0} in response")]
    MissingData(&'static str),
}

impl AdminApiError {
    /// Message safe to show on the panel.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(rejection) => rejection.message.clone(),
            Self::Banned { reason } => match reason {
                Some(reason) => format!("This account has been banned: {reason}"),
                None => "This account has been banned.".to_owned(),
            },
            Self::NotFound(what) => format!("{what} could not be found."),
            Self::Http(_) | Self::Parse(_) | Self::Status(_) | Self::MissingData(_) => {
                "The backend did not answer properly. Please retry.".to_owned()
            }
        }
    }
}
