//! Authentication route handlers for the admin panel.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::AdminApiError;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

use super::dashboard::render_or_500;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

fn describe_error(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_string(),
        "not_admin" => "This account does not have moderation access.".to_string(),
        "session" => "Could not start a session. Please try again.".to_string(),
        other => other.to_string(),
    }
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> Response {
    let template = LoginTemplate {
        error: query.error.as_deref().map(describe_error),
    };
    render_or_500(&template).into_response()
}

/// Handle login form submission.
///
/// The backend authenticates any role; only documents with the admin role
/// are allowed into the panel session. A 403 with ban details shows the
/// recorded reason.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.api().login(&form.email, &form.password).await {
        Ok(auth) => {
            let Some(admin) = CurrentAdmin::from_user(&auth.user) else {
                tracing::warn!("Non-admin account attempted panel login");
                return Redirect::to("/auth/login?error=not_admin").into_response();
            };

            if let Err(e) = set_current_admin(&session, &admin, &auth.token).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            Redirect::to("/dashboard").into_response()
        }
        Err(AdminApiError::Banned { reason }) => {
            let text = reason.unwrap_or_else(|| "no reason recorded".to_string());
            Redirect::to(&format!(
                "/auth/login?error={}",
                urlencoding::encode(&format!("This account has been banned: {text}"))
            ))
            .into_response()
        }
        Err(e) => {
            tracing::warn!("Admin login failed: {}", e);
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(token)) = session
        .get::<String>(crate::models::session_keys::API_TOKEN)
        .await
    {
        if let Err(e) = state.api().logout(&token).await {
            tracing::warn!("Failed to invalidate backend session: {}", e);
        }
    }

    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/auth/login").into_response()
}
