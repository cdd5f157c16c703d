//! Authentication route handlers.
//!
//! Handles login, registration, Google OAuth, and the email-verification
//! OTP flow. Credentials are forwarded to the adoption backend, which mints
//! the bearer token this layer stores in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pet_haven_core::Email;

use crate::api::ApiError;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{BearerToken, RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Seconds the user must wait between verification OTP sends.
const VERIFY_RESEND_COOLDOWN_SECS: i64 = 30;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// OTP entry form data.
#[derive(Debug, Deserialize)]
pub struct OtpForm {
    pub otp: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Query parameters for the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub google_enabled: bool,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
}

/// Email verification page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify.html")]
pub struct VerifyTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub resend_wait_secs: i64,
}

/// Banned-account page template, shown when the backend answers 403 with a
/// recorded reason.
#[derive(Template, WebTemplate)]
#[template(path = "auth/banned.html")]
pub struct BannedTemplate {
    pub user: Option<CurrentUser>,
    pub reason: Option<String>,
}

/// Map a redirect error code to the text shown on the page.
fn describe_error(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_string(),
        "password_mismatch" => "The passwords do not match.".to_string(),
        "password_too_short" => "Password must be at least 8 characters.".to_string(),
        "invalid_email" => "Please enter a valid email address.".to_string(),
        "email_taken" => "An account with this email already exists.".to_string(),
        "session" => "Could not start a session. Please try again.".to_string(),
        "oauth_state" => "Sign-in with Google expired. Please try again.".to_string(),
        "oauth" => "Sign-in with Google failed. Please try again.".to_string(),
        "otp" => "That code is wrong or has expired.".to_string(),
        "cooldown" => "Please wait before requesting another code.".to_string(),
        other => other.to_string(),
    }
}

/// Map a redirect success code to the text shown on the page.
fn describe_success(code: &str) -> String {
    match code {
        "registered" => "Account created. Welcome!".to_string(),
        "password_reset" => "Password updated. You can log in now.".to_string(),
        "otp_sent" => "A new code is on its way to your inbox.".to_string(),
        "verified" => "Your email address is verified.".to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        user: None,
        error: query.error.as_deref().map(describe_error),
        success: query.success.as_deref().map(describe_success),
        google_enabled: state.config().google.is_some(),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if Email::parse(&form.email).is_err() {
        return Redirect::to("/auth/login?error=invalid_email").into_response();
    }

    match state.api().login(&form.email, &form.password).await {
        Ok(auth) => {
            let current = CurrentUser::from(&auth.user);

            if let Err(e) = set_current_user(&session, &current, &auth.token).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            set_sentry_user(&current.id, Some(current.email.as_str()));
            Redirect::to("/account").into_response()
        }
        Err(ApiError::Banned { reason }) => {
            tracing::warn!("Banned account attempted login");
            BannedTemplate { user: None, reason }.into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

/// Handle logout.
///
/// Invalidates the backend session (best effort), then clears and flushes
/// the local one.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(token)) = session.get::<String>(session_keys::API_TOKEN).await {
        // Best effort; the local session dies either way
        if let Err(e) = state.api().logout(&token).await {
            tracing::warn!("Failed to invalidate backend session: {}", e);
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    clear_sentry_user();
    Redirect::to("/").into_response()
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        user: None,
        error: query.error.as_deref().map(describe_error),
    }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if Email::parse(&form.email).is_err() {
        return Redirect::to("/auth/register?error=invalid_email").into_response();
    }

    // Validate passwords match
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    // Validate password length
    if form.password.len() < 8 {
        return Redirect::to("/auth/register?error=password_too_short").into_response();
    }

    match state
        .api()
        .register(&form.name, &form.email, &form.password)
        .await
    {
        Ok(auth) => {
            let current = CurrentUser::from(&auth.user);

            if let Err(e) = set_current_user(&session, &current, &auth.token).await {
                tracing::error!("Failed to set session after registration: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            set_sentry_user(&current.id, Some(current.email.as_str()));
            // Fresh accounts go straight to email verification
            Redirect::to("/auth/verify").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            let error_msg = e.to_string();
            if error_msg.contains("taken") || error_msg.contains("exists") {
                Redirect::to("/auth/register?error=email_taken").into_response()
            } else {
                Redirect::to(&format!(
                    "/auth/register?error={}",
                    urlencoding::encode(&e.user_message())
                ))
                .into_response()
            }
        }
    }
}

// =============================================================================
// Google OAuth
// =============================================================================

/// Redirect to Google's OAuth consent screen with a CSRF state nonce.
#[instrument(skip(state, session))]
pub async fn google_redirect(State(state): State<AppState>, session: Session) -> Response {
    let Some(google) = &state.config().google else {
        return Redirect::to("/auth/login").into_response();
    };

    // Random state nonce, checked on callback
    let nonce: String = {
        let mut rng = rand::rng();
        (0..32)
            .map(|_| {
                const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
                let idx = rng.random_range(0..CHARSET.len());
                char::from(CHARSET[idx])
            })
            .collect()
    };

    if let Err(e) = session.insert(session_keys::OAUTH_STATE, &nonce).await {
        tracing::error!("Failed to store OAuth state: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }

    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);
    let mut consent_url = match url::Url::parse("https://accounts.google.com/o/oauth2/v2/auth") {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Failed to build consent URL: {}", e);
            return Redirect::to("/auth/login?error=oauth").into_response();
        }
    };
    consent_url
        .query_pairs_mut()
        .append_pair("client_id", &google.client_id)
        .append_pair("redirect_uri", &redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", "openid email profile")
        .append_pair("state", &nonce);

    Redirect::to(consent_url.as_str()).into_response()
}

/// Handle the Google OAuth callback.
///
/// The authorization code goes to the backend, which owns the identity
/// exchange; a 403 here means the Google-linked account is banned, and the
/// recorded reason is shown.
#[instrument(skip(state, session, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OAuthCallbackQuery>,
) -> Response {
    if query.error.is_some() {
        return Redirect::to("/auth/login?error=oauth").into_response();
    }

    let (Some(code), Some(callback_state)) = (query.code, query.state) else {
        return Redirect::to("/auth/login?error=oauth").into_response();
    };

    // CSRF check against the stored nonce
    let stored: Option<String> = session
        .remove(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();
    if stored.as_deref() != Some(callback_state.as_str()) {
        return Redirect::to("/auth/login?error=oauth_state").into_response();
    }

    match state.api().google_login(&code).await {
        Ok(auth) => {
            let current = CurrentUser::from(&auth.user);

            if let Err(e) = set_current_user(&session, &current, &auth.token).await {
                tracing::error!("Failed to set session after OAuth: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            set_sentry_user(&current.id, Some(current.email.as_str()));
            Redirect::to("/account").into_response()
        }
        Err(ApiError::Banned { reason }) => {
            tracing::warn!("Banned account attempted OAuth login");
            BannedTemplate { user: None, reason }.into_response()
        }
        Err(e) => {
            tracing::warn!("Google login failed: {}", e);
            Redirect::to("/auth/login?error=oauth").into_response()
        }
    }
}

// =============================================================================
// Email Verification OTP
// =============================================================================

/// Seconds left before another verification OTP may be sent.
async fn verify_resend_wait(session: &Session) -> i64 {
    let sent_at: Option<DateTime<Utc>> = session
        .get(session_keys::VERIFY_OTP_SENT_AT)
        .await
        .ok()
        .flatten();
    sent_at.map_or(0, |at| {
        (VERIFY_RESEND_COOLDOWN_SECS - (Utc::now() - at).num_seconds()).max(0)
    })
}

/// Display the email verification page.
pub async fn verify_page(
    RequireAuth(user): RequireAuth,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let resend_wait_secs = verify_resend_wait(&session).await;
    VerifyTemplate {
        user: Some(user),
        error: query.error.as_deref().map(describe_error),
        success: query.success.as_deref().map(describe_success),
        resend_wait_secs,
    }
}

/// Handle verification OTP submission.
#[instrument(skip(state, user, token, session, form))]
pub async fn verify(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    BearerToken(token): BearerToken,
    session: Session,
    Form(form): Form<OtpForm>,
) -> Response {
    match state.api().verify_account(&token, form.otp.trim()).await {
        Ok(()) => {
            // Refresh the session identity so the banner disappears
            let mut verified = user;
            verified.verified = true;
            if let Err(e) = session
                .insert(session_keys::CURRENT_USER, &verified)
                .await
            {
                tracing::error!("Failed to update session after verification: {}", e);
            }
            Redirect::to("/account?success=verified").into_response()
        }
        Err(e) => {
            tracing::warn!("Account verification failed: {}", e);
            Redirect::to("/auth/verify?error=otp").into_response()
        }
    }
}

/// Resend the verification OTP, subject to the 30-second cooldown.
#[instrument(skip(state, _user, token, session))]
pub async fn resend_verify_otp(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    BearerToken(token): BearerToken,
    session: Session,
) -> Response {
    if verify_resend_wait(&session).await > 0 {
        return Redirect::to("/auth/verify?error=cooldown").into_response();
    }

    match state.api().send_verify_otp(&token).await {
        Ok(()) => {
            if let Err(e) = session
                .insert(session_keys::VERIFY_OTP_SENT_AT, Utc::now())
                .await
            {
                tracing::error!("Failed to record OTP send time: {}", e);
            }
            Redirect::to("/auth/verify?success=otp_sent").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to send verification OTP: {}", e);
            Redirect::to(&format!(
                "/auth/verify?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}
