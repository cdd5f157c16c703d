//! Password-reset flow state machine.
//!
//! The flow has three linear steps: enter email, enter the emailed OTP, set
//! a new password. The state lives in the session as an explicit value, and
//! each step carries the proof the previous one produced - so the
//! new-password step cannot be reached without a verified OTP in the same
//! session, no matter what URL is requested.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use pet_haven_core::Email;

/// Seconds the user must wait between OTP sends.
pub const RESEND_COOLDOWN_SECS: i64 = 30;

/// Where the reset flow currently stands.
///
/// There is no backward transition; abandoning the flow (or reloading after
/// the session expires) restarts at the email step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetFlow {
    /// An OTP was emailed; waiting for the user to enter it.
    EmailSent {
        email: Email,
        sent_at: DateTime<Utc>,
    },
    /// The OTP verified; it is retained as the proof the final reset call
    /// needs.
    Verified { email: Email, otp: String },
}

impl ResetFlow {
    /// Enter the flow after a successful OTP send.
    #[must_use]
    pub fn email_sent(email: Email, now: DateTime<Utc>) -> Self {
        Self::EmailSent {
            email,
            sent_at: now,
        }
    }

    /// Advance after a successful OTP verification.
    ///
    /// Only the OTP-entry state can advance; asking a `Verified` flow to
    /// verify again just keeps its existing proof.
    #[must_use]
    pub fn verified(self, otp: String) -> Self {
        match self {
            Self::EmailSent { email, .. } => Self::Verified { email, otp },
            verified @ Self::Verified { .. } => verified,
        }
    }

    /// The email the flow was started for.
    #[must_use]
    pub const fn email(&self) -> &Email {
        match self {
            Self::EmailSent { email, .. } | Self::Verified { email, .. } => email,
        }
    }

    /// The verified OTP, present only once step two has succeeded.
    #[must_use]
    pub fn proof(&self) -> Option<&str> {
        match self {
            Self::EmailSent { .. } => None,
            Self::Verified { otp, .. } => Some(otp),
        }
    }

    /// Whether the new-password step may be shown.
    #[must_use]
    pub const fn can_set_password(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// Whether another OTP may be sent yet.
    #[must_use]
    pub fn can_resend(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::EmailSent { sent_at, .. } => {
                now - *sent_at >= Duration::seconds(RESEND_COOLDOWN_SECS)
            }
            // resending from the verified step restarts nothing; allow it
            Self::Verified { .. } => true,
        }
    }

    /// Seconds remaining on the resend cooldown.
    #[must_use]
    pub fn resend_wait_secs(&self, now: DateTime<Utc>) -> i64 {
        match self {
            Self::EmailSent { sent_at, .. } => {
                (RESEND_COOLDOWN_SECS - (now - *sent_at).num_seconds()).max(0)
            }
            Self::Verified { .. } => 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::parse("dana@example.com").unwrap()
    }

    #[test]
    fn test_new_flow_cannot_set_password() {
        let flow = ResetFlow::email_sent(email(), Utc::now());
        assert!(!flow.can_set_password());
        assert!(flow.proof().is_none());
    }

    #[test]
    fn test_verified_flow_carries_proof() {
        let flow = ResetFlow::email_sent(email(), Utc::now()).verified("482913".to_string());
        assert!(flow.can_set_password());
        assert_eq!(flow.proof(), Some("482913"));
        assert_eq!(flow.email().as_str(), "dana@example.com");
    }

    #[test]
    fn test_verifying_twice_keeps_first_proof() {
        let flow = ResetFlow::email_sent(email(), Utc::now())
            .verified("482913".to_string())
            .verified("000000".to_string());
        assert_eq!(flow.proof(), Some("482913"));
    }

    #[test]
    fn test_resend_cooldown() {
        let now = Utc::now();
        let flow = ResetFlow::email_sent(email(), now);

        assert!(!flow.can_resend(now));
        assert!(!flow.can_resend(now + Duration::seconds(29)));
        assert!(flow.can_resend(now + Duration::seconds(30)));

        assert_eq!(flow.resend_wait_secs(now + Duration::seconds(10)), 20);
        assert_eq!(flow.resend_wait_secs(now + Duration::seconds(45)), 0);
    }

    #[test]
    fn test_serde_roundtrip_for_session_storage() {
        let flow = ResetFlow::email_sent(email(), Utc::now()).verified("482913".to_string());
        let json = serde_json::to_string(&flow).unwrap();
        let restored: ResetFlow = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, flow);
    }
}
