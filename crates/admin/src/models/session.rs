//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state. The bearer token
//! the backend issues lives under its own key.

use serde::{Deserialize, Serialize};

use pet_haven_core::{Email, Role, User, UserId};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's backend ID.
    pub id: UserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
}

impl CurrentAdmin {
    /// Build the session identity from a user document, refusing non-admin
    /// roles.
    #[must_use]
    pub fn from_user(user: &User) -> Option<Self> {
        if user.role != Role::Admin {
            return None;
        }
        Some(Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        })
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the backend-issued bearer token.
    pub const API_TOKEN: &str = "api_token";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_user_rejects_non_admin_roles() {
        let vendor: User = serde_json::from_str(
            r#"{"_id": "u1", "name": "Dana", "email": "dana@example.com", "role": "vendor"}"#,
        )
        .unwrap();
        assert!(CurrentAdmin::from_user(&vendor).is_none());

        let admin: User = serde_json::from_str(
            r#"{"_id": "u2", "name": "Priya", "email": "priya@example.com", "role": "admin"}"#,
        )
        .unwrap();
        let current = CurrentAdmin::from_user(&admin).unwrap();
        assert_eq!(current.name, "Priya");
    }
}
