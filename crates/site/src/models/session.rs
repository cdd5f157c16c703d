//! Session-related types.
//!
//! Types stored in the session for authentication state. The backend-issued
//! bearer token is stored under its own key, not inside [`CurrentUser`], so
//! the identity can be logged and rendered without dragging the credential
//! along.

use serde::{Deserialize, Serialize};

use pet_haven_core::{Email, Role, User, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Whether the email address has been verified.
    pub verified: bool,
}

impl CurrentUser {
    /// Whether this account may use the vendor dashboard.
    #[must_use]
    pub fn is_vendor(&self) -> bool {
        self.role == Role::Vendor
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            verified: user.is_account_verified,
        }
    }
}

/// Session keys for authentication and flow state.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the backend-issued bearer token.
    pub const API_TOKEN: &str = "api_token";

    /// Key for the password-reset flow state machine.
    pub const RESET_FLOW: &str = "reset_flow";

    /// Key for the Google OAuth state nonce (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Key for the last account-verification OTP send time (resend cooldown).
    pub const VERIFY_OTP_SENT_AT: &str = "verify_otp_sent_at";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_from_document() {
        let user: User = serde_json::from_str(
            r#"{"_id": "u1", "name": "Dana", "email": "dana@example.com", "role": "vendor", "isAccountVerified": true}"#,
        )
        .unwrap();

        let current = CurrentUser::from(&user);
        assert!(current.is_vendor());
        assert!(current.verified);
        assert_eq!(current.name, "Dana");
    }
}
