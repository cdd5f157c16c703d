//! Adoption request route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use pet_haven_core::PetId;

use crate::filters;
use crate::middleware::{BearerToken, RequireAuth};
use crate::models::CurrentUser;
use crate::state::AppState;

use super::pets::PetView;

/// Adoption request form data.
#[derive(Debug, Deserialize)]
pub struct AdoptForm {
    pub reason: String,
}

/// Adoption request form template.
#[derive(Template, WebTemplate)]
#[template(path = "adopt/new.html")]
pub struct AdoptTemplate {
    pub user: Option<CurrentUser>,
    pub pet: PetView,
    pub error: Option<String>,
}

/// Display the adoption request form.
#[instrument(skip(state, user))]
pub async fn new_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<PetId>,
) -> Response {
    if let Err(e) = state.pets().refresh(state.api(), false).await {
        tracing::error!("Failed to refresh pet list: {e}");
    }

    let Some(pet) = state.pets().get(&id).await else {
        return Redirect::to("/pets").into_response();
    };

    if !pet.is_adoptable() {
        return Redirect::to(&format!("/pets/{id}")).into_response();
    }

    AdoptTemplate {
        user: Some(user),
        pet: PetView::from(&pet),
        error: None,
    }
    .into_response()
}

/// Submit the adoption request.
///
/// A declined submission (duplicate request, pet just adopted) re-renders
/// the form with the backend's message.
#[instrument(skip(state, user, token, form))]
pub async fn create_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    BearerToken(token): BearerToken,
    Path(id): Path<PetId>,
    Form(form): Form<AdoptForm>,
) -> Response {
    let reason = form.reason.trim();
    if reason.is_empty() {
        return render_with_error(
            &state,
            user,
            &id,
            "Please tell the shelter a little about your home.".to_string(),
        )
        .await;
    }

    match state.api().request_adoption(&token, &id, reason).await {
        Ok(()) => Redirect::to("/account?success=requested").into_response(),
        Err(e) => {
            tracing::warn!("Adoption request failed: {e}");
            render_with_error(&state, user, &id, e.user_message()).await
        }
    }
}

async fn render_with_error(
    state: &AppState,
    user: CurrentUser,
    id: &PetId,
    error: String,
) -> Response {
    let Some(pet) = state.pets().get(id).await else {
        return Redirect::to("/pets").into_response();
    };

    AdoptTemplate {
        user: Some(user),
        pet: PetView::from(&pet),
        error: Some(error),
    }
    .into_response()
}
