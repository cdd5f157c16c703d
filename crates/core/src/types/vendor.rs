//! Vendor application documents as served by the adoption backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::types::{Email, UserId, VendorApplicationId, VendorStatus};

/// An application by a user to become a vendor organization.
///
/// Created by a user submission, transitioned by admin approve/reject,
/// never deleted from this layer's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorApplication {
    #[serde(rename = "_id")]
    pub id: VendorApplicationId,
    pub organization_name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Hosted URL of the uploaded verification document.
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub status: VendorStatus,
    /// Review reason recorded on rejection.
    #[serde(default)]
    pub reason: Option<String>,
    /// The applying user account.
    #[serde(default)]
    pub user: Option<UserId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Keyed for VendorApplication {
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
            "_id": "V1",
            "organizationName": "Sunny Paws Shelter",
            "email": "contact@sunnypaws.org",
            "phone": "555-0100",
            "documentUrl": "https://img.example.com/license.pdf",
            "status": "Pending",
            "user": "u9"
        }"#;

        let app: VendorApplication = serde_json::from_str(json).unwrap();
        assert_eq!(app.organization_name, "Sunny Paws Shelter");
        assert_eq!(app.status, VendorStatus::Pending);
        assert_eq!(app.user.as_ref().map(UserId::as_str), Some("u9"));
    }
}
