//! User directory and admin-account route handlers.
//!
//! Ban and unban run through the user directory store optimistically: the
//! cached copy flips first and rolls back if the backend declines, with the
//! failure surfaced as a banner on redirect.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use pet_haven_core::{Email, User, UserId};

use crate::filters;
use crate::middleware::{AdminToken, RequireAdminAuth};
use crate::state::AppState;

use super::dashboard::{AdminUserView, render_or_500};

/// User display data for the directory table.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
    pub banned: bool,
    pub ban_reason: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            verified: user.is_account_verified,
            banned: user.is_banned(),
            ban_reason: user.ban_info.reason.clone().unwrap_or_default(),
        }
    }
}

/// Query parameters for the directory page.
#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    pub q: Option<String>,
    pub refresh: Option<bool>,
    pub error: Option<String>,
}

/// User directory page template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub users: Vec<UserView>,
    pub search_query: String,
    pub error: Option<String>,
}

/// Delete confirmation template.
#[derive(Template)]
#[template(path = "users/delete.html")]
pub struct UserDeleteTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub user: UserView,
}

/// Admin accounts page template.
#[derive(Template)]
#[template(path = "admins/index.html")]
pub struct AdminsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub admins: Vec<UserView>,
    pub error: Option<String>,
}

/// Create-admin form template.
#[derive(Template)]
#[template(path = "admins/new.html")]
pub struct NewAdminTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub error: Option<String>,
}

// =============================================================================
// Directory
// =============================================================================

/// User directory page handler.
#[instrument(skip(admin, token, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Html<String> {
    let force = query.refresh.unwrap_or(false);
    let mut error = query.error;

    if let Err(e) = state.users().refresh(state.api(), &token, force).await {
        tracing::error!("Failed to refresh user directory: {e}");
        error.get_or_insert_with(|| e.user_message());
    }

    let search_query = query.q.unwrap_or_default();
    let users = state.users().search(&search_query).await;

    let template = UsersIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/users".to_string(),
        users: users.iter().map(UserView::from).collect(),
        search_query,
        error,
    };

    render_or_500(&template)
}

/// Ban form data (the written reason).
#[derive(Debug, Deserialize)]
pub struct BanForm {
    pub reason: Option<String>,
}

/// Ban a user. Optimistic; on failure the directory rolls back and the
/// error shows on redirect.
#[instrument(skip(state, _admin, token, form))]
pub async fn ban(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<UserId>,
    Form(form): Form<BanForm>,
) -> Response {
    let reason = form
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    match state.users().ban(state.api(), &token, &id, reason).await {
        Ok(()) => Redirect::to("/users").into_response(),
        Err(e) => {
            tracing::warn!("Ban failed, directory rolled back: {e}");
            Redirect::to(&format!(
                "/users?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}

/// Lift a user's ban. Same optimistic contract as [`ban`].
#[instrument(skip(state, _admin, token))]
pub async fn unban(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<UserId>,
) -> Response {
    match state.users().unban(state.api(), &token, &id).await {
        Ok(()) => Redirect::to("/users").into_response(),
        Err(e) => {
            tracing::warn!("Unban failed, directory rolled back: {e}");
            Redirect::to(&format!(
                "/users?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}

/// Display the delete confirmation page. Account deletion is irreversible.
#[instrument(skip(admin, token, state))]
pub async fn delete_page(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Response {
    if let Err(e) = state.users().refresh(state.api(), &token, false).await {
        tracing::error!("Failed to refresh user directory: {e}");
    }

    let users = state.users().search("").await;
    let Some(user) = users.iter().find(|user| user.id == id) else {
        return Redirect::to("/users").into_response();
    };

    let template = UserDeleteTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/users".to_string(),
        user: UserView::from(user),
    };

    render_or_500(&template).into_response()
}

/// Delete a user after confirmation. Exactly one record leaves the
/// directory, and only once the backend confirms.
#[instrument(skip(state, _admin, token))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<UserId>,
) -> Response {
    match state.users().delete(state.api(), &token, &id).await {
        Ok(()) => Redirect::to("/users").into_response(),
        Err(e) => {
            tracing::warn!("User delete failed: {e}");
            Redirect::to(&format!(
                "/users?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}

// =============================================================================
// Admin accounts
// =============================================================================

/// Admin accounts page handler.
#[instrument(skip(admin, token, state))]
pub async fn admins_index(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
) -> Html<String> {
    let (admins, error) = match state.api().admins(&token).await {
        Ok(admins) => (admins.iter().map(UserView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch admins: {e}");
            (vec![], Some(e.user_message()))
        }
    };

    let template = AdminsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/admins".to_string(),
        admins,
        error,
    };

    render_or_500(&template)
}

/// Display the create-admin form.
pub async fn new_admin_page(RequireAdminAuth(admin): RequireAdminAuth) -> Html<String> {
    let template = NewAdminTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/admins".to_string(),
        error: None,
    };
    render_or_500(&template)
}

/// Create-admin form data.
#[derive(Debug, Deserialize)]
pub struct CreateAdminForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Create another admin account.
#[instrument(skip(state, admin, token, form))]
pub async fn create_admin(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Form(form): Form<CreateAdminForm>,
) -> Response {
    let render_error = |error: String| {
        let template = NewAdminTemplate {
            admin_user: AdminUserView::from(&admin),
            current_path: "/admins".to_string(),
            error: Some(error),
        };
        render_or_500(&template).into_response()
    };

    if Email::parse(&form.email).is_err() {
        return render_error("Please enter a valid email address.".to_string());
    }
    if form.password.len() < 8 {
        return render_error("Password must be at least 8 characters.".to_string());
    }

    match state
        .api()
        .create_admin(&token, form.name.trim(), &form.email, &form.password)
        .await
    {
        Ok(()) => Redirect::to("/admins").into_response(),
        Err(e) => {
            tracing::warn!("Create admin failed: {e}");
            render_error(e.user_message())
        }
    }
}
