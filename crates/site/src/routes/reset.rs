//! Password reset route handlers.
//!
//! Three linear steps backed by the session-stored [`ResetFlow`] state
//! machine: email entry, OTP entry, new password. Each handler checks the
//! machine, not the URL, so no step can be reached without the proof from
//! the previous one. Failure at a step keeps the user on that step.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pet_haven_core::Email;

use crate::filters;
use crate::models::{CurrentUser, ResetFlow, session_keys};
use crate::state::AppState;

use super::auth::MessageQuery;

// =============================================================================
// Form Types
// =============================================================================

/// Email entry form data.
#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub email: String,
}

/// OTP entry form data.
#[derive(Debug, Deserialize)]
pub struct OtpForm {
    pub otp: String,
}

/// New password form data.
#[derive(Debug, Deserialize)]
pub struct NewPasswordForm {
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Step 1: email entry.
#[derive(Template, WebTemplate)]
#[template(path = "reset/email.html")]
pub struct ResetEmailTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
}

/// Step 2: OTP entry.
#[derive(Template, WebTemplate)]
#[template(path = "reset/otp.html")]
pub struct ResetOtpTemplate {
    pub user: Option<CurrentUser>,
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
    pub resend_wait_secs: i64,
}

/// Step 3: new password.
#[derive(Template, WebTemplate)]
#[template(path = "reset/new_password.html")]
pub struct ResetPasswordTemplate {
    pub user: Option<CurrentUser>,
    pub email: String,
    pub error: Option<String>,
}

/// Map a redirect error code to the text shown on the page.
fn describe_error(code: &str) -> String {
    match code {
        "invalid_email" => "Please enter a valid email address.".to_string(),
        "otp" => "That code is wrong or has expired.".to_string(),
        "cooldown" => "Please wait before requesting another code.".to_string(),
        "password_mismatch" => "The passwords do not match.".to_string(),
        "password_too_short" => "Password must be at least 8 characters.".to_string(),
        other => other.to_string(),
    }
}

/// Read the flow from the session.
async fn read_flow(session: &Session) -> Option<ResetFlow> {
    session
        .get::<ResetFlow>(session_keys::RESET_FLOW)
        .await
        .ok()
        .flatten()
}

/// Write the flow back to the session, logging (not failing) on error.
async fn write_flow(session: &Session, flow: &ResetFlow) {
    if let Err(e) = session.insert(session_keys::RESET_FLOW, flow).await {
        tracing::error!("Failed to store reset flow: {}", e);
    }
}

// =============================================================================
// Step 1: email entry
// =============================================================================

/// Display the email entry page. Always reachable; entering it restarts
/// the flow.
pub async fn email_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    ResetEmailTemplate {
        user: None,
        error: query.error.as_deref().map(describe_error),
    }
}

/// Send a reset OTP and advance to the OTP step.
#[instrument(skip(state, session, form))]
pub async fn send_otp(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<EmailForm>,
) -> Response {
    let Ok(email) = Email::parse(form.email.trim()) else {
        return Redirect::to("/auth/forgot-password?error=invalid_email").into_response();
    };

    match state.api().send_reset_otp(email.as_str()).await {
        Ok(()) => {
            write_flow(&session, &ResetFlow::email_sent(email, Utc::now())).await;
            Redirect::to("/auth/forgot-password/otp").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to send reset OTP: {}", e);
            Redirect::to(&format!(
                "/auth/forgot-password?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}

// =============================================================================
// Step 2: OTP entry
// =============================================================================

/// Display the OTP entry page. Requires the flow to exist.
pub async fn otp_page(session: Session, Query(query): Query<MessageQuery>) -> Response {
    let Some(flow) = read_flow(&session).await else {
        return Redirect::to("/auth/forgot-password").into_response();
    };

    ResetOtpTemplate {
        user: None,
        email: flow.email().to_string(),
        error: query.error.as_deref().map(describe_error),
        success: query.success.map(|_| "A new code is on its way.".to_string()),
        resend_wait_secs: flow.resend_wait_secs(Utc::now()),
    }
    .into_response()
}

/// Verify the OTP and advance to the new-password step.
#[instrument(skip(state, session, form))]
pub async fn verify_otp(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OtpForm>,
) -> Response {
    let Some(flow) = read_flow(&session).await else {
        return Redirect::to("/auth/forgot-password").into_response();
    };

    let otp = form.otp.trim().to_string();
    match state.api().verify_reset_otp(flow.email().as_str(), &otp).await {
        Ok(()) => {
            write_flow(&session, &flow.verified(otp)).await;
            Redirect::to("/auth/forgot-password/new").into_response()
        }
        Err(e) => {
            tracing::warn!("Reset OTP verification failed: {}", e);
            Redirect::to("/auth/forgot-password/otp?error=otp").into_response()
        }
    }
}

/// Resend the reset OTP, subject to the 30-second cooldown.
#[instrument(skip(state, session))]
pub async fn resend_otp(State(state): State<AppState>, session: Session) -> Response {
    let Some(flow) = read_flow(&session).await else {
        return Redirect::to("/auth/forgot-password").into_response();
    };

    let now = Utc::now();
    if !flow.can_resend(now) {
        return Redirect::to("/auth/forgot-password/otp?error=cooldown").into_response();
    }

    let email = flow.email().clone();
    match state.api().send_reset_otp(email.as_str()).await {
        Ok(()) => {
            // Resending restarts the OTP step, cooldown included
            write_flow(&session, &ResetFlow::email_sent(email, now)).await;
            Redirect::to("/auth/forgot-password/otp?success=sent").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to resend reset OTP: {}", e);
            Redirect::to(&format!(
                "/auth/forgot-password/otp?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}

// =============================================================================
// Step 3: new password
// =============================================================================

/// Display the new-password page. Requires a verified flow.
pub async fn new_password_page(session: Session, Query(query): Query<MessageQuery>) -> Response {
    let Some(flow) = read_flow(&session).await else {
        return Redirect::to("/auth/forgot-password").into_response();
    };

    if !flow.can_set_password() {
        return Redirect::to("/auth/forgot-password/otp").into_response();
    }

    ResetPasswordTemplate {
        user: None,
        email: flow.email().to_string(),
        error: query.error.as_deref().map(describe_error),
    }
    .into_response()
}

/// Set the new password using the verified OTP as proof, then finish the
/// flow at the login page.
#[instrument(skip(state, session, form))]
pub async fn set_new_password(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewPasswordForm>,
) -> Response {
    let Some(flow) = read_flow(&session).await else {
        return Redirect::to("/auth/forgot-password").into_response();
    };

    let Some(otp) = flow.proof() else {
        // the machine, not the URL, is the guard
        return Redirect::to("/auth/forgot-password/otp").into_response();
    };

    if form.password != form.password_confirm {
        return Redirect::to("/auth/forgot-password/new?error=password_mismatch").into_response();
    }

    if form.password.len() < 8 {
        return Redirect::to("/auth/forgot-password/new?error=password_too_short").into_response();
    }

    match state
        .api()
        .reset_password(flow.email().as_str(), otp, &form.password)
        .await
    {
        Ok(()) => {
            if let Err(e) = session.remove::<ResetFlow>(session_keys::RESET_FLOW).await {
                tracing::error!("Failed to clear reset flow: {}", e);
            }
            Redirect::to("/auth/login?success=password_reset").into_response()
        }
        Err(e) => {
            tracing::warn!("Password reset failed: {}", e);
            Redirect::to(&format!(
                "/auth/forgot-password/new?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}
