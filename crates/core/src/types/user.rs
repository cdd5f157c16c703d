//! User documents as served by the adoption backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::types::{Email, PetId, Role, UserId};

/// Ban state attached to every user document.
///
/// `is_banned` is the single source of truth for whether an account may act;
/// the reason and timestamp exist only for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BanInfo {
    pub is_banned: bool,
    pub reason: Option<String>,
    pub banned_at: Option<DateTime<Utc>>,
}

/// A user document.
///
/// Non-authoritative copy of backend state; the frontends never mutate these
/// fields directly, they re-fetch or splice in whatever the backend returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_account_verified: bool,
    #[serde(default)]
    pub ban_info: BanInfo,
    #[serde(default)]
    pub favorite_pets: Vec<PetId>,
    #[serde(default)]
    pub adopted_pets: Vec<PetId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account is currently banned.
    #[must_use]
    pub const fn is_banned(&self) -> bool {
        self.ban_info.is_banned
    }

    /// Whether the given pet is in the user's favorites.
    #[must_use]
    pub fn has_favorite(&self, pet: &PetId) -> bool {
        self.favorite_pets.contains(pet)
    }
}

impl Keyed for User {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_document() {
        let json = r#"{
            "_id": "66b2f0c1a9",
            "name": "Dana Reeves",
            "email": "dana@example.com",
            "role": "vendor",
            "isAccountVerified": true,
            "banInfo": { "isBanned": true, "reason": "spam listings" },
            "favoritePets": ["p1", "p2"]
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.as_str(), "66b2f0c1a9");
        assert_eq!(user.role, Role::Vendor);
        assert!(user.is_banned());
        assert_eq!(user.ban_info.reason.as_deref(), Some("spam listings"));
        assert!(user.has_favorite(&PetId::new("p2")));
        assert!(user.adopted_pets.is_empty());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"_id": "u1", "name": "Sam", "email": "sam@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_banned());
        assert!(!user.is_account_verified);
    }
}
