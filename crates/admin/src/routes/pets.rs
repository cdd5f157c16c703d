//! Pet moderation route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use pet_haven_core::{Collection, Pet, PetId};

use crate::filters;
use crate::middleware::{AdminToken, RequireAdminAuth};
use crate::state::AppState;

use super::dashboard::{AdminUserView, render_or_500};

/// Pet display data for the moderation table.
#[derive(Debug, Clone)]
pub struct PetView {
    pub id: String,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub status: String,
    pub locked: bool,
    pub lock_reason: String,
}

impl From<&Pet> for PetView {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id.to_string(),
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            status: pet.status.to_string(),
            locked: pet.is_locked,
            lock_reason: pet.lock_reason.clone().unwrap_or_default(),
        }
    }
}

/// Query parameters for the moderation page.
#[derive(Debug, Deserialize)]
pub struct PetsQuery {
    pub q: Option<String>,
    pub error: Option<String>,
}

/// Pet moderation page template.
#[derive(Template)]
#[template(path = "pets/index.html")]
pub struct PetsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub pets: Vec<PetView>,
    pub search_query: String,
    pub error: Option<String>,
}

/// Pet moderation page handler with name/species/breed search.
#[instrument(skip(admin, token, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
    Query(query): Query<PetsQuery>,
) -> Html<String> {
    let search_query = query.q.unwrap_or_default();

    let (pets, fetch_error) = match state.api().all_pets(&token).await {
        Ok(pets) => {
            let collection = Collection::from_items(pets);
            let filtered = collection
                .filter(&search_query, |pet: &Pet| {
                    vec![&pet.name, &pet.species, &pet.breed]
                })
                .into_iter()
                .map(PetView::from)
                .collect();
            (filtered, None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch pets: {e}");
            (vec![], Some(e.user_message()))
        }
    };

    let template = PetsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/pets".to_string(),
        pets,
        search_query,
        error: query.error.or(fetch_error),
    };

    render_or_500(&template)
}

/// Lock form data (optional recorded reason).
#[derive(Debug, Deserialize)]
pub struct LockForm {
    pub reason: Option<String>,
}

/// Lock a listing, hiding it from public browsing.
#[instrument(skip(state, _admin, token, form))]
pub async fn lock(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<PetId>,
    Form(form): Form<LockForm>,
) -> Response {
    let reason = form
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    match state.api().lock_pet(&token, &id, reason).await {
        Ok(_) => Redirect::to("/pets").into_response(),
        Err(e) => {
            tracing::warn!("Pet lock failed: {e}");
            Redirect::to(&format!(
                "/pets?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}

/// Unlock a listing.
#[instrument(skip(state, _admin, token))]
pub async fn unlock(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<PetId>,
) -> Response {
    match state.api().unlock_pet(&token, &id).await {
        Ok(_) => Redirect::to("/pets").into_response(),
        Err(e) => {
            tracing::warn!("Pet unlock failed: {e}");
            Redirect::to(&format!(
                "/pets?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}
