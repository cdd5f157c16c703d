//! Per-endpoint payload and request-body types.
//!
//! The backend names its payload key differently per route (`pets`,
//! `blogs`, `userData`, `requests`, ...). Each payload struct here is the
//! normalization adapter for one endpoint family; every field carries
//! `#[serde(default)]` because `success: false` bodies omit the payload.

use serde::{Deserialize, Serialize};

use pet_haven_core::{AdoptionRequest, BanInfo, BlogPost, Pet, PetId, User};

// =============================================================================
// Domain results
// =============================================================================

/// A login/registration result: the backend-issued bearer token plus the
/// authenticated user document.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Response payloads
// =============================================================================

/// Payload of `POST /api/auth/login`, `/register`, and `/google`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_data: Option<User>,
}

/// Payload of `GET /api/user` (own profile).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    #[serde(default)]
    pub user_data: Option<User>,
}

/// Payload of `GET /api/pets/all-pets` and `GET /api/pets/getPets`.
#[derive(Debug, Default, Deserialize)]
pub struct PetsPayload {
    #[serde(default)]
    pub pets: Vec<Pet>,
}

/// Payload of pet mutations that echo the changed listing back.
#[derive(Debug, Default, Deserialize)]
pub struct PetPayload {
    #[serde(default)]
    pub pet: Option<Pet>,
}

/// Payload of `GET /api/adoption/adoption-requests`.
#[derive(Debug, Default, Deserialize)]
pub struct RequestsPayload {
    #[serde(default)]
    pub requests: Vec<AdoptionRequest>,
}

/// Payload of `GET /api/blogs`.
#[derive(Debug, Default, Deserialize)]
pub struct BlogsPayload {
    #[serde(default)]
    pub blogs: Vec<BlogPost>,
}

/// Payload of `GET /api/blogs/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct BlogPayload {
    #[serde(default)]
    pub blog: Option<BlogPost>,
}

/// Payload of `PUT /api/user/favorite`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesPayload {
    #[serde(default)]
    pub favorite_pets: Vec<PetId>,
}

/// Body the backend attaches to an HTTP 403 for banned accounts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanPayload {
    #[serde(default)]
    pub ban_info: Option<BanInfo>,
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GoogleBody<'a> {
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub struct OtpBody<'a> {
    pub otp: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmailBody<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyResetBody<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordBody<'a> {
    pub email: &'a str,
    pub otp: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBody<'a> {
    pub pet_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptBody<'a> {
    pub pet_id: &'a str,
    pub reason: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDecisionBody<'a> {
    pub request_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

/// Fields of a new or edited pet listing. The photo is uploaded to the
/// image host first; only its URL travels here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetBody<'a> {
    pub name: &'a str,
    pub species: &'a str,
    pub breed: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'a str>,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adoption_fee: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorApplyBody<'a> {
    pub organization_name: &'a str,
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<&'a str>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pet_haven_core::envelope::Envelope;

    #[test]
    fn test_auth_payload_decodes_login_envelope() {
        let body = r#"{
            "success": true,
            "token": "jwt.abc.def",
            "userData": { "_id": "u1", "name": "Dana", "email": "dana@example.com" }
        }"#;
        let envelope: Envelope<AuthPayload> = serde_json::from_str(body).unwrap();
        let payload = envelope.into_result().unwrap();
        assert_eq!(payload.token.as_deref(), Some("jwt.abc.def"));
        assert_eq!(payload.user_data.unwrap().name, "Dana");
    }

    #[test]
    fn test_pets_payload_decodes_list_envelope() {
        let body = r#"{
            "success": true,
            "pets": [
                { "_id": "p1", "name": "Biscuit", "species": "Dog", "breed": "Beagle" }
            ]
        }"#;
        let envelope: Envelope<PetsPayload> = serde_json::from_str(body).unwrap();
        let payload = envelope.into_result().unwrap();
        assert_eq!(payload.pets.len(), 1);
    }

    #[test]
    fn test_pet_body_skips_absent_fields() {
        let body = PetBody {
            name: "Biscuit",
            species: "Dog",
            breed: "Beagle",
            age: None,
            gender: None,
            size: None,
            description: "Good with kids",
            image_url: None,
            adoption_fee: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("age").is_none());
        assert!(json.get("imageUrl").is_none());
        assert_eq!(json["name"], "Biscuit");
    }

    #[test]
    fn test_ban_payload_decodes_403_body() {
        let body = r#"{
            "success": false,
            "message": "account banned",
            "banInfo": { "isBanned": true, "reason": "spam listings" }
        }"#;
        let payload: Envelope<BanPayload> = serde_json::from_str(body).unwrap();
        let info = payload.payload.ban_info.unwrap();
        assert!(info.is_banned);
        assert_eq!(info.reason.as_deref(), Some("spam listings"));
    }
}
