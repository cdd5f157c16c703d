//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Pets
//! GET  /pets                   - Pet listing (q = substring search, refresh = re-fetch)
//! GET  /pets/{id}              - Pet detail
//! POST /pets/{id}/favorite     - Toggle favorite (requires auth)
//! GET  /pets/{id}/adopt        - Adoption request form (requires auth)
//! POST /pets/{id}/adopt        - Submit adoption request
//!
//! # Blog
//! GET  /blog                   - Blog listing (q = substring search)
//! GET  /blog/{id}              - Blog post
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! GET  /auth/google            - Redirect to Google OAuth
//! GET  /auth/google/callback   - Handle OAuth callback
//! GET  /auth/verify            - Email verification page (requires auth)
//! POST /auth/verify            - Confirm verification OTP
//! POST /auth/verify/resend     - Resend verification OTP (30s cooldown)
//!
//! # Password reset (session state machine)
//! GET  /auth/forgot-password       - Step 1: email entry
//! POST /auth/forgot-password       - Send reset OTP
//! GET  /auth/forgot-password/otp   - Step 2: OTP entry
//! POST /auth/forgot-password/otp   - Verify reset OTP
//! POST /auth/forgot-password/resend - Resend reset OTP (30s cooldown)
//! GET  /auth/forgot-password/new   - Step 3: new password (verified only)
//! POST /auth/forgot-password/new   - Set new password
//!
//! # Account (requires auth)
//! GET  /account                - Profile, favorites, adopted pets
//!
//! # Vendor (requires vendor role)
//! GET  /vendor                 - Dashboard
//! GET  /vendor/pets            - Own listings (q = substring search)
//! GET  /vendor/pets/new        - New listing form
//! POST /vendor/pets            - Create listing (multipart, photo upload)
//! GET  /vendor/pets/{id}/edit  - Edit listing form
//! POST /vendor/pets/{id}      - Update listing (multipart)
//! GET  /vendor/pets/{id}/delete - Delete confirmation
//! POST /vendor/pets/{id}/delete - Delete listing
//! GET  /vendor/requests        - Adoption requests (q = substring search)
//! POST /vendor/requests/{id}/approve - Approve request
//! POST /vendor/requests/{id}/reject  - Reject request (written reason)
//! GET  /vendor/apply           - Vendor application form (any account)
//! POST /vendor/apply           - Submit application (multipart, document upload)
//! ```

pub mod account;
pub mod adopt;
pub mod auth;
pub mod blog;
pub mod home;
pub mod pets;
pub mod reset;
pub mod vendor;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router (rate limited).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        // Google OAuth
        .route("/google", get(auth::google_redirect))
        .route("/google/callback", get(auth::google_callback))
        // Email verification OTP
        .route("/verify", get(auth::verify_page).post(auth::verify))
        .route("/verify/resend", post(auth::resend_verify_otp))
        // Password reset state machine
        .route(
            "/forgot-password",
            get(reset::email_page).post(reset::send_otp),
        )
        .route(
            "/forgot-password/otp",
            get(reset::otp_page).post(reset::verify_otp),
        )
        .route("/forgot-password/resend", post(reset::resend_otp))
        .route(
            "/forgot-password/new",
            get(reset::new_password_page).post(reset::set_new_password),
        )
        .layer(auth_rate_limiter())
}

/// Create the pet routes router.
pub fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pets::index))
        .route("/{id}", get(pets::show))
        .route("/{id}/favorite", post(pets::favorite))
        .route("/{id}/adopt", get(adopt::new_request).post(adopt::create_request))
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{id}", get(blog::show))
}

/// Create the vendor routes router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(vendor::dashboard))
        .route("/pets", get(vendor::pets_index).post(vendor::create_pet))
        .route("/pets/new", get(vendor::new_pet_page))
        .route("/pets/{id}", post(vendor::update_pet))
        .route("/pets/{id}/edit", get(vendor::edit_pet_page))
        .route(
            "/pets/{id}/delete",
            get(vendor::delete_pet_page).post(vendor::delete_pet),
        )
        .route("/requests", get(vendor::requests_index))
        .route("/requests/{id}/approve", post(vendor::approve_request))
        .route("/requests/{id}/reject", post(vendor::reject_request))
        .route("/apply", get(vendor::apply_page).post(vendor::apply))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Pet routes
        .nest("/pets", pet_routes())
        // Blog routes
        .nest("/blog", blog_routes())
        // Account routes
        .route("/account", get(account::index))
        // Vendor routes
        .nest("/vendor", vendor_routes())
        // Auth routes
        .nest("/auth", auth_routes())
}
