//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Redirect to dashboard
//! GET  /health                  - Health check
//!
//! # Auth
//! GET  /auth/login              - Login page (admin role required to proceed)
//! POST /auth/login              - Login action
//! POST /auth/logout             - Logout action
//!
//! # Moderation
//! GET  /dashboard               - Counts overview
//! GET  /users                   - User directory (q = name/email search)
//! POST /users/{id}/ban          - Ban with recorded reason (optimistic)
//! POST /users/{id}/unban        - Lift ban (optimistic)
//! GET  /users/{id}/delete       - Delete confirmation
//! POST /users/{id}/delete       - Delete account
//! GET  /admins                  - Admin accounts
//! GET  /admins/new              - Create-admin form
//! POST /admins                  - Create admin
//! GET  /vendors                 - Vendor applications (view = all|pending)
//! POST /vendors/{id}/approve    - Approve application
//! POST /vendors/{id}/reject     - Reject application (written reason)
//! GET  /pets                    - Pet moderation (q = name/species/breed)
//! POST /pets/{id}/lock          - Lock listing (optional reason)
//! POST /pets/{id}/unlock        - Unlock listing
//! GET  /adoptions               - Adoption oversight (q = pet/applicant)
//! POST /adoptions/{id}/approve  - Approve request
//! POST /adoptions/{id}/reject   - Reject request (written reason)
//! GET  /blogs                   - Blog management (q = title/author/category)
//! GET  /blogs/new               - New post form
//! POST /blogs                   - Create post (multipart, cover upload)
//! GET  /blogs/{id}/delete       - Delete confirmation
//! POST /blogs/{id}/delete       - Delete post
//! ```

pub mod adoptions;
pub mod auth;
pub mod blogs;
pub mod dashboard;
pub mod pets;
pub mod users;
pub mod vendors;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Dashboard
        .route("/dashboard", get(dashboard::index))
        // Users
        .route("/users", get(users::index))
        .route("/users/{id}/ban", post(users::ban))
        .route("/users/{id}/unban", post(users::unban))
        .route(
            "/users/{id}/delete",
            get(users::delete_page).post(users::delete),
        )
        // Admins
        .route("/admins", get(users::admins_index).post(users::create_admin))
        .route("/admins/new", get(users::new_admin_page))
        // Vendor applications
        .route("/vendors", get(vendors::index))
        .route("/vendors/{id}/approve", post(vendors::approve))
        .route("/vendors/{id}/reject", post(vendors::reject))
        // Pets
        .route("/pets", get(pets::index))
        .route("/pets/{id}/lock", post(pets::lock))
        .route("/pets/{id}/unlock", post(pets::unlock))
        // Adoption requests
        .route("/adoptions", get(adoptions::index))
        .route("/adoptions/{id}/approve", post(adoptions::approve))
        .route("/adoptions/{id}/reject", post(adoptions::reject))
        // Blog
        .route("/blogs", get(blogs::index).post(blogs::create))
        .route("/blogs/new", get(blogs::new_page))
        .route(
            "/blogs/{id}/delete",
            get(blogs::delete_page).post(blogs::delete),
        )
}
