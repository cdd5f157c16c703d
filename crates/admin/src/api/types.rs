//! Per-endpoint payload and request-body types for moderation calls.
//!
//! Every payload field carries `#[serde(default)]` because `success: false`
//! bodies omit the payload key.

use serde::{Deserialize, Serialize};

use pet_haven_core::{AdoptionRequest, BanInfo, BlogPost, Pet, User, VendorApplication};

/// A login result: bearer token plus the authenticated user document.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Response payloads
// =============================================================================

/// Payload of `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_data: Option<User>,
}

/// Payload of `GET /api/user` (every user account).
#[derive(Debug, Default, Deserialize)]
pub struct UsersPayload {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Payload of `GET /api/user/admins`.
#[derive(Debug, Default, Deserialize)]
pub struct AdminsPayload {
    #[serde(default)]
    pub admins: Vec<User>,
}

/// Payload of user mutations that echo the changed account back.
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub user: Option<User>,
}

/// Payload of the vendor application list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct VendorsPayload {
    #[serde(default)]
    pub vendors: Vec<VendorApplication>,
}

/// Payload of `GET /api/pets/all-pets`.
#[derive(Debug, Default, Deserialize)]
pub struct PetsPayload {
    #[serde(default)]
    pub pets: Vec<Pet>,
}

/// Payload of pet lock/unlock, echoing the changed listing.
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

/// Payload of `POST /api/blogs/create`.
#[derive(Debug, Default, Deserialize)]
pub struct BlogPayload {
    #[serde(default)]
    pub blog: Option<BlogPost>,
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
#[serde(rename_all = "camelCase")]
pub struct BanBody<'a> {
    pub user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdBody<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateAdminBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ReasonBody<'a> {
    pub reason: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockBody<'a> {
    pub pet_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetIdBody<'a> {
    pub pet_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDecisionBody<'a> {
    pub request_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogBody<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub category: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pet_haven_core::envelope::Envelope;

    #[test]
    fn test_users_payload_decodes_list_envelope() {
        let body = r#"{
            "success": true,
            "users": [
                { "_id": "u1", "name": "Dana", "email": "dana@example.com",
                  "banInfo": { "isBanned": false } }
            ]
        }"#;
        let envelope: Envelope<UsersPayload> = serde_json::from_str(body).unwrap();
        let payload = envelope.into_result().unwrap();
        assert_eq!(payload.users.len(), 1);
        assert!(!payload.users[0].is_banned());
    }

    #[test]
    fn test_ban_body_wire_casing() {
        let body = BanBody {
            user_id: "u1",
            reason: Some("spam listings"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["reason"], "spam listings");
    }

    #[test]
    fn test_lock_body_skips_missing_reason() {
        let body = LockBody {
            pet_id: "p1",
            reason: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["petId"], "p1");
        assert!(json.get("reason").is_none());
    }
}
