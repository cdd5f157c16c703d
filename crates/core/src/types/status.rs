//! Status enums for users, pets, adoption requests, and vendor applications.
//!
//! Serde renames match the backend wire casing exactly: account roles and
//! adoption statuses travel lowercase, pet and vendor statuses capitalized.

use serde::{Deserialize, Serialize};

/// Account role attached to every user document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular adopter account.
    #[default]
    User,
    /// Organization account permitted to list pets and manage adoption
    /// requests for its own pets.
    Vendor,
    /// Moderation account.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Vendor => write!(f, "vendor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "vendor" => Ok(Self::Vendor),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Listing status of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Adopted,
}

impl std::fmt::Display for PetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
            Self::Pending => write!(f, "Pending"),
            Self::Adopted => write!(f, "Adopted"),
        }
    }
}

/// Status of an adoption request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Review status of a vendor application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VendorStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_casing() {
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"vendor\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("vendor".parse::<Role>().unwrap(), Role::Vendor);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_pet_status_wire_casing() {
        assert_eq!(
            serde_json::to_string(&PetStatus::Available).unwrap(),
            "\"Available\""
        );
        let parsed: PetStatus = serde_json::from_str("\"Adopted\"").unwrap();
        assert_eq!(parsed, PetStatus::Adopted);
    }

    #[test]
    fn test_adoption_status_wire_casing() {
        assert_eq!(
            serde_json::to_string(&AdoptionStatus::Approved).unwrap(),
            "\"approved\""
        );
        let parsed: AdoptionStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, AdoptionStatus::Rejected);
    }

    #[test]
    fn test_vendor_status_wire_casing() {
        assert_eq!(
            serde_json::to_string(&VendorStatus::Pending).unwrap(),
            "\"Pending\""
        );
        let parsed: VendorStatus = serde_json::from_str("\"Approved\"").unwrap();
        assert_eq!(parsed, VendorStatus::Approved);
    }
}
