//! The backend's JSON response envelope.
//!
//! Every backend response carries at least a `success` boolean and usually a
//! `message`; the payload key varies per endpoint (`users`, `pets`, `blogs`,
//! `userData`, ...). This module turns that shape into one discriminated
//! result at the boundary so internal code never branches on raw JSON.
//!
//! # Example
//!
//! ```
//! use pet_haven_core::envelope::Envelope;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct PetsPayload {
//!     #[serde(default)]
//!     pets: Vec<serde_json::Value>,
//! }
//!
//! let body = r#"{ "success": true, "pets": [] }"#;
//! let envelope: Envelope<PetsPayload> = serde_json::from_str(body).unwrap();
//! let payload = envelope.into_result().unwrap();
//! assert!(payload.pets.is_empty());
//! ```

use serde::Deserialize;

/// A business-rule failure reported by the backend (`success: false`).
///
/// Distinct from transport failures: the HTTP exchange worked, the backend
/// declined the operation and said why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
}

impl Rejection {
    /// Fallback text for envelopes that decline without a message.
    pub const DEFAULT_MESSAGE: &'static str = "the request was not successful";
}

/// The `{ success, message?, <payload> }` envelope wrapping every response.
///
/// `P` is a per-endpoint payload struct whose fields all carry
/// `#[serde(default)]`, because a `success: false` body omits them.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<P> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: P,
}

impl<P> Envelope<P> {
    /// Collapse the envelope into a discriminated result.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection`] when the backend reported `success: false`,
    /// carrying its message (or a fallback when it sent none).
    pub fn into_result(self) -> Result<P, Rejection> {
        if self.success {
            Ok(self.payload)
        } else {
            Err(Rejection {
                message: self
                    .message
                    .unwrap_or_else(|| Rejection::DEFAULT_MESSAGE.to_owned()),
            })
        }
    }
}

/// Payload for endpoints that acknowledge without returning data
/// (logout, OTP sends, status transitions).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Ack {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct NamesPayload {
        #[serde(default)]
        names: Vec<String>,
    }

    #[test]
    fn test_success_with_payload() {
        let body = r#"{ "success": true, "names": ["a", "b"] }"#;
        let envelope: Envelope<NamesPayload> = serde_json::from_str(body).unwrap();
        let payload = envelope.into_result().unwrap();
        assert_eq!(payload.names, vec!["a", "b"]);
    }

    #[test]
    fn test_failure_carries_message() {
        let body = r#"{ "success": false, "message": "pet already adopted" }"#;
        let envelope: Envelope<NamesPayload> = serde_json::from_str(body).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.message, "pet already adopted");
    }

    #[test]
    fn test_failure_without_message_gets_fallback() {
        let body = r#"{ "success": false }"#;
        let envelope: Envelope<Ack> = serde_json::from_str(body).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.message, Rejection::DEFAULT_MESSAGE);
    }

    #[test]
    fn test_failure_body_omits_payload_fields() {
        // success:false bodies carry no payload keys; defaults must fill in
        let body = r#"{ "success": false, "message": "nope" }"#;
        let envelope: Envelope<NamesPayload> = serde_json::from_str(body).unwrap();
        assert!(envelope.payload.names.is_empty());
        assert!(envelope.into_result().is_err());
    }

    #[test]
    fn test_ack_ignores_extra_keys() {
        let body = r#"{ "success": true, "message": "OTP sent", "expiresIn": 300 }"#;
        let envelope: Envelope<Ack> = serde_json::from_str(body).unwrap();
        assert!(envelope.into_result().is_ok());
    }
}
