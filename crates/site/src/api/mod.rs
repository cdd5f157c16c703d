//! REST client for the adoption backend.
//!
//! # Architecture
//!
//! - The backend owns every entity; this client holds no state beyond a
//!   short-lived `moka` cache for blog reads (5 minute TTL).
//! - Every response is a `{success, message?, <payload>}` envelope; the
//!   client normalizes it through [`pet_haven_core::envelope::Envelope`]
//!   into typed results, so callers never see raw JSON.
//! - Authenticated calls pass the backend-issued bearer token, which lives
//!   in the session.
//!
//! # Example
//!
//! ```rust,ignore
//! use pet_haven_site::api::Client;
//!
//! let client = Client::new(&config.backend);
//!
//! let pets = client.all_pets().await?;
//! let session = client.login("adopter@example.com", "hunter2!").await?;
//! client.request_adoption(&session.token, &pets[0].id, "We have a yard.").await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::Client;
pub use types::AuthSession;

use pet_haven_core::envelope::Rejection;
use thiserror::Error;

/// Errors that can occur when talking to the adoption backend.
#[derive(Debug, Error)]
pub enum ApiError {
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

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The backend returned a non-success status with no envelope.
    #[error("Backend returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The envelope was successful but the expected payload was absent.
    #[error("missing {0} in response")]
    MissingData(&'static str),
}

impl ApiError {
    /// Message safe to show to the person using the site.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(rejection) => rejection.message.clone(),
            Self::Banned { reason } => match reason {
                Some(reason) => format!("This account has been banned: {reason}"),
                None => "This account has been banned.".to_owned(),
            },
            Self::NotFound(what) => format!("{what} could not be found."),
            Self::RateLimited(_) => "Too many attempts. Please wait and try again.".to_owned(),
            Self::Http(_) | Self::Parse(_) | Self::Status(_) | Self::MissingData(_) => {
                "Something went wrong talking to the server. Please try again.".to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_backend_message() {
        let err = ApiError::Rejected(Rejection {
            message: "pet already adopted".to_string(),
        });
        assert_eq!(err.to_string(), "pet already adopted");
        assert_eq!(err.user_message(), "pet already adopted");
    }

    #[test]
    fn test_banned_with_reason() {
        let err = ApiError::Banned {
            reason: Some("spam listings".to_string()),
        };
        assert_eq!(err.to_string(), "account banned: spam listings");
        assert!(err.user_message().contains("spam listings"));
    }

    #[test]
    fn test_banned_without_reason() {
        let err = ApiError::Banned { reason: None };
        assert_eq!(err.to_string(), "account banned: no reason recorded");
    }

    #[test]
    fn test_transport_errors_hide_detail_from_users() {
        let err = ApiError::MissingData("userData");
        assert_eq!(err.to_string(), "missing userData in response");
        assert!(!err.user_message().contains("userData"));
    }
}
