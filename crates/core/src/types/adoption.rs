//! Adoption request documents as served by the adoption backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::types::{AdoptionRequestId, AdoptionStatus, PetId, UserId};

/// A request proposing that a specific user adopt a specific pet.
///
/// The backend denormalizes the pet and applicant display names so list
/// pages can render without follow-up lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRequest {
    #[serde(rename = "_id")]
    pub id: AdoptionRequestId,
    pub pet: PetId,
    #[serde(default)]
    pub pet_name: String,
    pub applicant: UserId,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub vendor: Option<UserId>,
    #[serde(default)]
    pub status: AdoptionStatus,
    /// Free text: the applicant's motivation, or the reviewer's reason on
    /// rejection.
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AdoptionRequest {
    /// Whether the request is still awaiting a decision.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == AdoptionStatus::Pending
    }
}

impl Keyed for AdoptionRequest {
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
            "_id": "r1",
            "pet": "p42",
            "petName": "Biscuit",
            "applicant": "u7",
            "applicantName": "Dana Reeves",
            "vendor": "v1",
            "status": "pending",
            "reason": "We have a fenced yard and two kids who adore beagles."
        }"#;

        let req: AdoptionRequest = serde_json::from_str(json).unwrap();
        assert!(req.is_open());
        assert_eq!(req.pet_name, "Biscuit");
        assert_eq!(req.status, AdoptionStatus::Pending);
    }
}
