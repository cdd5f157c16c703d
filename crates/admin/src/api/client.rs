//! Moderation client implementation.
//!
//! Every method takes the admin's bearer token; list reads are never cached
//! here - each panel page is an explicit point-in-time snapshot, and the
//! user directory store owns the one cached collection.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use pet_haven_core::envelope::{Ack, Envelope};
use pet_haven_core::{
    AdoptionRequest, AdoptionRequestId, BlogId, BlogPost, Pet, PetId, User, UserId,
    VendorApplication, VendorApplicationId,
};

use crate::config::BackendConfig;

use super::AdminApiError;
use super::types::{
    AdminsPayload, AuthPayload, AuthSession, BanBody, BanPayload, BlogPayload, BlogsPayload,
    CreateAdminBody, LockBody, LoginBody, NewBlogBody, PetIdBody, PetPayload, PetsPayload,
    ReasonBody, RequestDecisionBody, RequestsPayload, UserIdBody, UserPayload, UsersPayload,
    VendorsPayload,
};

/// Timeout applied to every backend call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the adoption backend's moderation endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a new moderation client.
    ///
    /// # Panics
    ///
    /// This function will not panic. The reqwest configuration uses only a
    /// request timeout, which is always accepted by `ClientBuilder`.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client with only a timeout is valid");

        Self {
            inner: Arc::new(AdminClientInner {
                http,
                base_url: config.base_url.clone(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a request and decode its `{success, message?, ...}` envelope.
    async fn execute<P>(&self, request: reqwest::RequestBuilder) -> Result<P, AdminApiError>
    where
        P: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        // 403 with ban details is the one status code handled specially
        if status == StatusCode::FORBIDDEN {
            if let Ok(envelope) = serde_json::from_str::<Envelope<BanPayload>>(&response_text) {
                let reason = envelope
                    .payload
                    .ban_info
                    .and_then(|info| info.reason)
                    .or(envelope.message);
                return Err(AdminApiError::Banned { reason });
            }
            return Err(AdminApiError::Status(status));
        }

        let envelope: Envelope<P> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                if status.is_success() {
                    tracing::error!(
                        error = %e,
                        body = %response_text.chars().take(500).collect::<String>(),
                        "Failed to parse backend response"
                    );
                    return Err(AdminApiError::Parse(e));
                }
                tracing::error!(
                    status = %status,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Backend returned non-success status"
                );
                return Err(AdminApiError::Status(status));
            }
        };

        Ok(envelope.into_result()?)
    }

    async fn get<P>(&self, path: &str, token: &str) -> Result<P, AdminApiError>
    where
        P: DeserializeOwned,
    {
        let request = self.inner.http.get(self.url(path)).bearer_auth(token);
        self.execute(request).await
    }

    async fn post_json<B, P>(&self, path: &str, token: &str, body: &B) -> Result<P, AdminApiError>
    where
        B: Serialize + ?Sized,
        P: DeserializeOwned,
    {
        let request = self
            .inner
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body);
        self.execute(request).await
    }

    async fn put_json<B, P>(&self, path: &str, token: &str, body: &B) -> Result<P, AdminApiError>
    where
        B: Serialize + ?Sized,
        P: DeserializeOwned,
    {
        let request = self
            .inner
            .http
            .put(self.url(path))
            .bearer_auth(token)
            .json(body);
        self.execute(request).await
    }

    async fn put_empty<P>(&self, path: &str, token: &str) -> Result<P, AdminApiError>
    where
        P: DeserializeOwned,
    {
        let request = self.inner.http.put(self.url(path)).bearer_auth(token);
        self.execute(request).await
    }

    async fn delete_json<B, P>(&self, path: &str, token: &str, body: &B) -> Result<P, AdminApiError>
    where
        B: Serialize + ?Sized,
        P: DeserializeOwned,
    {
        let request = self
            .inner
            .http
            .delete(self.url(path))
            .bearer_auth(token)
            .json(body);
        self.execute(request).await
    }

    async fn delete<P>(&self, path: &str, token: &str) -> Result<P, AdminApiError>
    where
        P: DeserializeOwned,
    {
        let request = self.inner.http.delete(self.url(path)).bearer_auth(token);
        self.execute(request).await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in. Role checking happens in the login route; the backend mints
    /// the same token shape for every role.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::Banned` for banned accounts (HTTP 403).
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AdminApiError> {
        let payload: AuthPayload = self
            .execute(
                self.inner
                    .http
                    .post(self.url("/api/auth/login"))
                    .json(&LoginBody { email, password }),
            )
            .await?;

        let token = payload.token.ok_or(AdminApiError::MissingData("token"))?;
        let user = payload
            .user_data
            .ok_or(AdminApiError::MissingData("userData"))?;
        Ok(AuthSession { token, user })
    }

    /// Invalidate the backend session for this token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), AdminApiError> {
        let _: Ack = self
            .execute(
                self.inner
                    .http
                    .post(self.url("/api/auth/logout"))
                    .bearer_auth(token),
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Fetch every user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn users(&self, token: &str) -> Result<Vec<User>, AdminApiError> {
        let payload: UsersPayload = self.get("/api/user", token).await?;
        Ok(payload.users)
    }

    /// Fetch every admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn admins(&self, token: &str) -> Result<Vec<User>, AdminApiError> {
        let payload: AdminsPayload = self.get("/api/user/admins", token).await?;
        Ok(payload.admins)
    }

    /// Ban a user with a recorded reason. Returns the updated document when
    /// the backend echoes it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the ban is declined or the request fails.
    #[instrument(skip(self, token, reason), fields(user_id = %id))]
    pub async fn ban_user(
        &self,
        token: &str,
        id: &UserId,
        reason: Option<&str>,
    ) -> Result<Option<User>, AdminApiError> {
        let payload: UserPayload = self
            .put_json(
                "/api/user/ban",
                token,
                &BanBody {
                    user_id: id.as_str(),
                    reason,
                },
            )
            .await?;
        Ok(payload.user)
    }

    /// Lift a user's ban.
    ///
    /// # Errors
    ///
    /// Returns an error if the unban is declined or the request fails.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn unban_user(&self, token: &str, id: &UserId) -> Result<Option<User>, AdminApiError> {
        let payload: UserPayload = self
            .put_json(
                "/api/user/unban",
                token,
                &UserIdBody {
                    user_id: id.as_str(),
                },
            )
            .await?;
        Ok(payload.user)
    }

    /// Delete a user account permanently.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is declined or the request fails.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn delete_user(&self, token: &str, id: &UserId) -> Result<(), AdminApiError> {
        let _: Ack = self
            .delete_json(
                "/api/user/delete-user",
                token,
                &UserIdBody {
                    user_id: id.as_str(),
                },
            )
            .await?;
        Ok(())
    }

    /// Create another admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the request fails.
    #[instrument(skip(self, token, password), fields(email = %email))]
    pub async fn create_admin(
        &self,
        token: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AdminApiError> {
        let _: Ack = self
            .post_json(
                "/api/user/create-admin",
                token,
                &CreateAdminBody {
                    name,
                    email,
                    password,
                },
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Vendor applications
    // =========================================================================

    /// Fetch every vendor application.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn vendor_applications(
        &self,
        token: &str,
    ) -> Result<Vec<VendorApplication>, AdminApiError> {
        let payload: VendorsPayload = self
            .get("/api/vendors/all-vendor-applications", token)
            .await?;
        Ok(payload.vendors)
    }

    /// Fetch only applications still awaiting review.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn pending_vendors(&self, token: &str) -> Result<Vec<VendorApplication>, AdminApiError> {
        let payload: VendorsPayload = self.get("/api/vendors/pending-vendors", token).await?;
        Ok(payload.vendors)
    }

    /// Approve a vendor application.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision is declined or the request fails.
    #[instrument(skip(self, token), fields(application_id = %id))]
    pub async fn approve_vendor(
        &self,
        token: &str,
        id: &VendorApplicationId,
    ) -> Result<(), AdminApiError> {
        let _: Ack = self
            .put_empty(&format!("/api/vendors/approve-vendor/{id}"), token)
            .await?;
        Ok(())
    }

    /// Reject a vendor application with a written reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision is declined or the request fails.
    #[instrument(skip(self, token, reason), fields(application_id = %id))]
    pub async fn reject_vendor(
        &self,
        token: &str,
        id: &VendorApplicationId,
        reason: &str,
    ) -> Result<(), AdminApiError> {
        let _: Ack = self
            .put_json(
                &format!("/api/vendors/reject-vendor/{id}"),
                token,
                &ReasonBody { reason },
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Pets
    // =========================================================================

    /// Fetch every pet listing, locked ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn all_pets(&self, token: &str) -> Result<Vec<Pet>, AdminApiError> {
        let payload: PetsPayload = self.get("/api/pets/all-pets", token).await?;
        Ok(payload.pets)
    }

    /// Lock (hide/freeze) a listing, with an optional recorded reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is declined or the request fails.
    #[instrument(skip(self, token, reason), fields(pet_id = %id))]
    pub async fn lock_pet(
        &self,
        token: &str,
        id: &PetId,
        reason: Option<&str>,
    ) -> Result<Option<Pet>, AdminApiError> {
        let payload: PetPayload = self
            .post_json(
                "/api/pets/lock",
                token,
                &LockBody {
                    pet_id: id.as_str(),
                    reason,
                },
            )
            .await?;
        Ok(payload.pet)
    }

    /// Unlock a listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the unlock is declined or the request fails.
    #[instrument(skip(self, token), fields(pet_id = %id))]
    pub async fn unlock_pet(&self, token: &str, id: &PetId) -> Result<Option<Pet>, AdminApiError> {
        let payload: PetPayload = self
            .post_json(
                "/api/pets/unlock",
                token,
                &PetIdBody {
                    pet_id: id.as_str(),
                },
            )
            .await?;
        Ok(payload.pet)
    }

    // =========================================================================
    // Adoption requests
    // =========================================================================

    /// Fetch every adoption request across all vendors.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn adoption_requests(&self, token: &str) -> Result<Vec<AdoptionRequest>, AdminApiError> {
        let payload: RequestsPayload = self.get("/api/adoption/adoption-requests", token).await?;
        Ok(payload.requests)
    }

    /// Approve an adoption request on a vendor's behalf.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision is declined or the request fails.
    #[instrument(skip(self, token), fields(request_id = %id))]
    pub async fn approve_adoption(
        &self,
        token: &str,
        id: &AdoptionRequestId,
    ) -> Result<(), AdminApiError> {
        let _: Ack = self
            .post_json(
                "/api/adoption/approve",
                token,
                &RequestDecisionBody {
                    request_id: id.as_str(),
                    reason: None,
                },
            )
            .await?;
        Ok(())
    }

    /// Reject an adoption request with a written reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision is declined or the request fails.
    #[instrument(skip(self, token, reason), fields(request_id = %id))]
    pub async fn reject_adoption(
        &self,
        token: &str,
        id: &AdoptionRequestId,
        reason: &str,
    ) -> Result<(), AdminApiError> {
        let _: Ack = self
            .post_json(
                "/api/adoption/reject",
                token,
                &RequestDecisionBody {
                    request_id: id.as_str(),
                    reason: Some(reason),
                },
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Blog
    // =========================================================================

    /// Fetch every blog post.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn blogs(&self, token: &str) -> Result<Vec<BlogPost>, AdminApiError> {
        let payload: BlogsPayload = self.get("/api/blogs", token).await?;
        Ok(payload.blogs)
    }

    /// Create a blog post. The cover image is uploaded to the image host
    /// beforehand; only its URL travels here.
    ///
    /// # Errors
    ///
    /// Returns an error if the post is declined or the request fails.
    #[instrument(skip(self, token, blog), fields(title = %blog.title))]
    pub async fn create_blog(
        &self,
        token: &str,
        blog: &NewBlogBody<'_>,
    ) -> Result<Option<BlogPost>, AdminApiError> {
        let payload: BlogPayload = self.post_json("/api/blogs/create", token, blog).await?;
        Ok(payload.blog)
    }

    /// Delete a blog post.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is declined or the request fails.
    #[instrument(skip(self, token), fields(blog_id = %id))]
    pub async fn delete_blog(&self, token: &str, id: &BlogId) -> Result<(), AdminApiError> {
        let _: Ack = self.delete(&format!("/api/blogs/{id}"), token).await?;
        Ok(())
    }
}
