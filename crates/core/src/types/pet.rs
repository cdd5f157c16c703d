//! Pet documents as served by the adoption backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::types::{PetId, PetStatus, Price, UserId};

/// A pet listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub breed: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: PetStatus,
    /// Admin-set flag hiding/freezing the listing.
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub lock_reason: Option<String>,
    #[serde(default)]
    pub adoption_fee: Option<Price>,
    /// Owning vendor account.
    #[serde(default)]
    pub vendor: Option<UserId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Pet {
    /// Whether the listing should appear in public browsing.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !self.is_locked
    }

    /// Whether an adoption request can currently be submitted.
    #[must_use]
    pub fn is_adoptable(&self) -> bool {
        self.is_visible() && self.status == PetStatus::Available
    }
}

impl Keyed for Pet {
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
            "_id": "p42",
            "name": "Biscuit",
            "species": "Dog",
            "breed": "Beagle",
            "age": 3,
            "imageUrl": "https://img.example.com/biscuit.jpg",
            "status": "Available",
            "isLocked": false,
            "adoptionFee": "85.00",
            "vendor": "v1"
        }"#;

        let pet: Pet = serde_json::from_str(json).unwrap();
        assert_eq!(pet.name, "Biscuit");
        assert_eq!(pet.status, PetStatus::Available);
        assert!(pet.is_adoptable());
        assert_eq!(pet.adoption_fee.unwrap().to_string(), "$85.00");
    }

    #[test]
    fn test_locked_pet_not_adoptable() {
        let json = r#"{
            "_id": "p1",
            "name": "Rex",
            "species": "Dog",
            "breed": "Mix",
            "isLocked": true,
            "lockReason": "listing under review"
        }"#;
        let pet: Pet = serde_json::from_str(json).unwrap();
        assert!(!pet.is_visible());
        assert!(!pet.is_adoptable());
        assert_eq!(pet.lock_reason.as_deref(), Some("listing under review"));
    }

    #[test]
    fn test_pending_pet_not_adoptable() {
        let json = r#"{
            "_id": "p2",
            "name": "Mo",
            "species": "Cat",
            "breed": "Tabby",
            "status": "Pending"
        }"#;
        let pet: Pet = serde_json::from_str(json).unwrap();
        assert!(pet.is_visible());
        assert!(!pet.is_adoptable());
    }
}
