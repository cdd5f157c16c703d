//! Adoption backend client implementation.
//!
//! One method per endpoint the site consumes; every method funnels through
//! [`Client::execute`], which owns status mapping and envelope decoding.
//! Blog reads are cached with `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use pet_haven_core::envelope::{Ack, Envelope};
use pet_haven_core::{AdoptionRequest, AdoptionRequestId, BlogId, BlogPost, Pet, PetId, User};

use crate::config::BackendConfig;

use super::ApiError;
use super::cache::CacheValue;
use super::types::{
    AdoptBody, AuthPayload, AuthSession, BanPayload, BlogPayload, BlogsPayload, EmailBody,
    FavoriteBody, FavoritesPayload, GoogleBody, LoginBody, OtpBody, PetBody, PetPayload,
    PetsPayload, ProfilePayload, RegisterBody, RequestDecisionBody, RequestsPayload,
    ResetPasswordBody, VendorApplyBody, VerifyResetBody,
};

/// Timeout applied to every backend call. A hung backend fails the page
/// instead of hanging it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Client
// =============================================================================

/// Client for the adoption backend REST API.
///
/// Cheaply cloneable via `Arc`. Blog reads are cached for 5 minutes; the
/// pet list container lives in [`crate::store::PetStore`], not here.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl Client {
    /// Create a new backend client.
    ///
    /// # Panics
    ///
    /// This function will not panic. The reqwest configuration uses only a
    /// request timeout, which is always accepted by `ClientBuilder`.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client with only a timeout is valid");

        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a request and decode its `{success, message?, ...}` envelope.
    async fn execute<P>(&self, request: reqwest::RequestBuilder) -> Result<P, ApiError>
    where
        P: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        // Banned accounts come back as 403 with ban details in the body;
        // this is the one status code the frontends distinguish.
        if status == StatusCode::FORBIDDEN {
            if let Ok(envelope) = serde_json::from_str::<Envelope<BanPayload>>(&response_text) {
                let reason = envelope
                    .payload
                    .ban_info
                    .and_then(|info| info.reason)
                    .or(envelope.message);
                return Err(ApiError::Banned { reason });
            }
            return Err(ApiError::Status(status));
        }

        // Parse the envelope; the backend reports business failures inside
        // 2xx and 4xx bodies alike, so try the envelope before giving up on
        // the status code.
        let envelope: Envelope<P> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                if status.is_success() {
                    tracing::error!(
                        error = %e,
                        body = %response_text.chars().take(500).collect::<String>(),
                        "Failed to parse backend response"
                    );
                    return Err(ApiError::Parse(e));
                }
                tracing::error!(
                    status = %status,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Backend returned non-success status"
                );
                return Err(ApiError::Status(status));
            }
        };

        Ok(envelope.into_result()?)
    }

    async fn get<P>(&self, path: &str, token: Option<&str>) -> Result<P, ApiError>
    where
        P: DeserializeOwned,
    {
        let mut request = self.inner.http.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.execute(request).await
    }

    async fn post_json<B, P>(&self, path: &str, token: Option<&str>, body: &B) -> Result<P, ApiError>
    where
        B: Serialize + ?Sized,
        P: DeserializeOwned,
    {
        let mut request = self.inner.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.execute(request).await
    }

    async fn post_empty<P>(&self, path: &str, token: &str) -> Result<P, ApiError>
    where
        P: DeserializeOwned,
    {
        let request = self.inner.http.post(self.url(path)).bearer_auth(token);
        self.execute(request).await
    }

    async fn put_json<B, P>(&self, path: &str, token: &str, body: &B) -> Result<P, ApiError>
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

    async fn delete<P>(&self, path: &str, token: &str) -> Result<P, ApiError>
    where
        P: DeserializeOwned,
    {
        let request = self.inner.http.delete(self.url(path)).bearer_auth(token);
        self.execute(request).await
    }

    /// Whether the backend answers HTTP at all. Used by the readiness probe.
    pub async fn ping(&self) -> bool {
        self.inner
            .http
            .get(self.url("/api/auth/is-auth"))
            .send()
            .await
            .is_ok()
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Banned` for banned accounts (HTTP 403), otherwise
    /// the usual envelope/transport failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let payload: AuthPayload = self
            .post_json("/api/auth/login", None, &LoginBody { email, password })
            .await?;
        into_auth_session(payload)
    }

    /// Register a new adopter account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let payload: AuthPayload = self
            .post_json(
                "/api/auth/register",
                None,
                &RegisterBody {
                    name,
                    email,
                    password,
                },
            )
            .await?;
        into_auth_session(payload)
    }

    /// Exchange a Google OAuth authorization code for a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Banned` for banned accounts (HTTP 403).
    #[instrument(skip(self, code))]
    pub async fn google_login(&self, code: &str) -> Result<AuthSession, ApiError> {
        let payload: AuthPayload = self
            .post_json("/api/auth/google", None, &GoogleBody { code })
            .await?;
        into_auth_session(payload)
    }

    /// Invalidate the backend session for this token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let _: Ack = self.post_empty("/api/auth/logout", token).await?;
        Ok(())
    }

    /// Whether the token is still accepted by the backend.
    ///
    /// A declined envelope means "not authenticated", not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failures.
    #[instrument(skip(self, token))]
    pub async fn is_auth(&self, token: &str) -> Result<bool, ApiError> {
        match self.get::<Ack>("/api/auth/is-auth", Some(token)).await {
            Ok(Ack {}) => Ok(true),
            Err(ApiError::Rejected(_)) => Ok(false),
            Err(ApiError::Status(status)) if status == StatusCode::UNAUTHORIZED => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: &str) -> Result<User, ApiError> {
        let payload: ProfilePayload = self.get("/api/user/data", Some(token)).await?;
        payload.user_data.ok_or(ApiError::MissingData("userData"))
    }

    // =========================================================================
    // OTP flows
    // =========================================================================

    /// Ask the backend to email an account-verification OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn send_verify_otp(&self, token: &str) -> Result<(), ApiError> {
        let _: Ack = self.post_empty("/api/auth/send-verify-otp", token).await?;
        Ok(())
    }

    /// Confirm the account-verification OTP.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the code is wrong or expired.
    #[instrument(skip(self, token, otp))]
    pub async fn verify_account(&self, token: &str, otp: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .post_json("/api/auth/verify-account", Some(token), &OtpBody { otp })
            .await?;
        Ok(())
    }

    /// Ask the backend to email a password-reset OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn send_reset_otp(&self, email: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .post_json("/api/auth/send-reset-otp", None, &EmailBody { email })
            .await?;
        Ok(())
    }

    /// Check a password-reset OTP without consuming it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the code is wrong or expired.
    #[instrument(skip(self, otp), fields(email = %email))]
    pub async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .post_json(
                "/api/auth/verify-reset-otp",
                None,
                &VerifyResetBody { email, otp },
            )
            .await?;
        Ok(())
    }

    /// Set a new password using a verified reset OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the OTP no longer verifies or the request fails.
    #[instrument(skip(self, otp, new_password), fields(email = %email))]
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let _: Ack = self
            .post_json(
                "/api/auth/reset-password",
                None,
                &ResetPasswordBody {
                    email,
                    otp,
                    new_password,
                },
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Pets
    // =========================================================================

    /// Fetch every pet listing. Uncached here; the pet store owns staleness.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_pets(&self) -> Result<Vec<Pet>, ApiError> {
        let payload: PetsPayload = self.get("/api/pets/all-pets", None).await?;
        Ok(payload.pets)
    }

    /// Fetch the authenticated vendor's own listings.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn my_pets(&self, token: &str) -> Result<Vec<Pet>, ApiError> {
        let payload: PetsPayload = self.get("/api/pets/getPets", Some(token)).await?;
        Ok(payload.pets)
    }

    /// Create a pet listing. Returns the created document when the backend
    /// echoes it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing is declined or the request fails.
    #[instrument(skip(self, token, pet), fields(name = %pet.name))]
    pub async fn add_pet(&self, token: &str, pet: &PetBody<'_>) -> Result<Option<Pet>, ApiError> {
        let payload: PetPayload = self.post_json("/api/pets/add", Some(token), pet).await?;
        Ok(payload.pet)
    }

    /// Update a pet listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is declined or the request fails.
    #[instrument(skip(self, token, pet), fields(pet_id = %id))]
    pub async fn update_pet(
        &self,
        token: &str,
        id: &PetId,
        pet: &PetBody<'_>,
    ) -> Result<Option<Pet>, ApiError> {
        let payload: PetPayload = self
            .put_json(&format!("/api/pets/{id}"), token, pet)
            .await?;
        Ok(payload.pet)
    }

    /// Delete a pet listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is declined or the request fails.
    #[instrument(skip(self, token), fields(pet_id = %id))]
    pub async fn delete_pet(&self, token: &str, id: &PetId) -> Result<(), ApiError> {
        let _: Ack = self.delete(&format!("/api/pets/{id}"), token).await?;
        Ok(())
    }

    /// Toggle a pet in the user's favorites; returns the updated id list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(pet_id = %pet_id))]
    pub async fn toggle_favorite(&self, token: &str, pet_id: &PetId) -> Result<Vec<PetId>, ApiError> {
        let payload: FavoritesPayload = self
            .put_json(
                "/api/user/favorite",
                token,
                &FavoriteBody {
                    pet_id: pet_id.as_str(),
                },
            )
            .await?;
        Ok(payload.favorite_pets)
    }

    // =========================================================================
    // Adoption requests
    // =========================================================================

    /// Fetch adoption requests visible to this token (the backend scopes
    /// vendors to their own pets).
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn adoption_requests(&self, token: &str) -> Result<Vec<AdoptionRequest>, ApiError> {
        let payload: RequestsPayload = self
            .get("/api/adoption/adoption-requests", Some(token))
            .await?;
        Ok(payload.requests)
    }

    /// Submit an adoption request for a pet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` for duplicate or ineligible requests.
    #[instrument(skip(self, token, reason), fields(pet_id = %pet_id))]
    pub async fn request_adoption(
        &self,
        token: &str,
        pet_id: &PetId,
        reason: &str,
    ) -> Result<(), ApiError> {
        let _: Ack = self
            .post_json(
                "/api/adoption/request",
                Some(token),
                &AdoptBody {
                    pet_id: pet_id.as_str(),
                    reason,
                },
            )
            .await?;
        Ok(())
    }

    /// Approve an adoption request for one of the vendor's pets.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision is declined or the request fails.
    #[instrument(skip(self, token), fields(request_id = %id))]
    pub async fn approve_request(&self, token: &str, id: &AdoptionRequestId) -> Result<(), ApiError> {
        let _: Ack = self
            .post_json(
                "/api/adoption/approve",
                Some(token),
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
    pub async fn reject_request(
        &self,
        token: &str,
        id: &AdoptionRequestId,
        reason: &str,
    ) -> Result<(), ApiError> {
        let _: Ack = self
            .post_json(
                "/api/adoption/reject",
                Some(token),
                &RequestDecisionBody {
                    request_id: id.as_str(),
                    reason: Some(reason),
                },
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Vendor applications
    // =========================================================================

    /// Submit a vendor application for the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when an application is already on file.
    #[instrument(skip(self, token, application), fields(organization = %application.organization_name))]
    pub async fn apply_vendor(
        &self,
        token: &str,
        application: &VendorApplyBody<'_>,
    ) -> Result<(), ApiError> {
        let _: Ack = self
            .post_json("/api/vendors/apply", Some(token), application)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Blog (cached - read-only on the site)
    // =========================================================================

    /// Fetch all blog posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn blogs(&self) -> Result<Vec<BlogPost>, ApiError> {
        let cache_key = "blogs".to_string();

        if let Some(CacheValue::Blogs(blogs)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for blogs");
            return Ok(blogs);
        }

        let payload: BlogsPayload = self.get("/api/blogs", None).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Blogs(payload.blogs.clone()))
            .await;

        Ok(payload.blogs)
    }

    /// Fetch a single blog post.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when no post has that id.
    #[instrument(skip(self), fields(blog_id = %id))]
    pub async fn blog(&self, id: &BlogId) -> Result<BlogPost, ApiError> {
        let cache_key = format!("blog:{id}");

        if let Some(CacheValue::Blog(post)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for blog post");
            return Ok(*post);
        }

        let payload: BlogPayload = self.get(&format!("/api/blogs/{id}"), None).await?;

        let post = payload
            .blog
            .ok_or_else(|| ApiError::NotFound(format!("Blog post {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Blog(Box::new(post.clone())))
            .await;

        Ok(post)
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Normalize an auth payload into a session, requiring both halves.
fn into_auth_session(payload: AuthPayload) -> Result<AuthSession, ApiError> {
    let token = payload.token.ok_or(ApiError::MissingData("token"))?;
    let user = payload.user_data.ok_or(ApiError::MissingData("userData"))?;
    Ok(AuthSession { token, user })
}
