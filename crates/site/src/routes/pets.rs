//! Pet browsing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pet_haven_core::{Pet, PetId};

use crate::filters;
use crate::middleware::{BearerToken, OptionalAuth, RequireAuth};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Pet display data for templates.
#[derive(Debug, Clone)]
pub struct PetView {
    pub id: String,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub description: String,
    pub image_url: Option<String>,
    pub status: String,
    pub adoptable: bool,
    pub fee: String,
}

impl From<&Pet> for PetView {
    fn from(pet: &Pet) -> Self {
        let age = pet.age.map(|years| {
            if years == 1 {
                "1 year".to_string()
            } else {
                format!("{years} years")
            }
        });

        let fee = pet
            .adoption_fee
            .map_or_else(|| "Free to a good home".to_string(), |fee| fee.to_string());

        Self {
            id: pet.id.to_string(),
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            age,
            gender: pet.gender.clone(),
            size: pet.size.clone(),
            description: pet.description.clone(),
            image_url: pet.image_url.clone(),
            status: pet.status.to_string(),
            adoptable: pet.is_adoptable(),
            fee,
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// Set by the explicit Refresh action to bypass the cached copy.
    pub refresh: Option<bool>,
}

/// Pet listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "pets/index.html")]
pub struct PetsIndexTemplate {
    pub user: Option<CurrentUser>,
    pub pets: Vec<PetView>,
    pub search_query: String,
    pub error: Option<String>,
}

/// Pet detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "pets/show.html")]
pub struct PetShowTemplate {
    pub user: Option<CurrentUser>,
    pub pet: PetView,
    pub is_favorite: bool,
}

/// Display the pet listing page.
///
/// The cached copy is refreshed when stale or when the Refresh action asks
/// for it; a failed refresh keeps the previous copy and shows an error.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let force = query.refresh.unwrap_or(false);
    let error = match state.pets().refresh(state.api(), force).await {
        Ok(()) => None,
        Err(e) => {
            tracing::error!("Failed to refresh pet list: {e}");
            Some(e.user_message())
        }
    };

    let search_query = query.q.unwrap_or_default();
    let pets = state.pets().browse(&search_query).await;

    PetsIndexTemplate {
        user,
        pets: pets.iter().map(PetView::from).collect(),
        search_query,
        error,
    }
}

/// Display the pet detail page.
#[instrument(skip(state, user, session))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Path(id): Path<PetId>,
) -> Response {
    // Detail reads come out of the same cached copy the listing uses
    if let Err(e) = state.pets().refresh(state.api(), false).await {
        tracing::error!("Failed to refresh pet list: {e}");
    }

    let Some(pet) = state.pets().get(&id).await else {
        return Redirect::to("/pets").into_response();
    };

    if !pet.is_visible() {
        return Redirect::to("/pets").into_response();
    }

    // Favorite state needs the profile; best effort, logged-out renders
    // the plain button.
    let mut is_favorite = false;
    if user.is_some()
        && let Ok(Some(token)) = session.get::<String>(session_keys::API_TOKEN).await
        && let Ok(profile) = state.api().profile(&token).await
    {
        is_favorite = profile.has_favorite(&id);
    }

    PetShowTemplate {
        user,
        pet: PetView::from(&pet),
        is_favorite,
    }
    .into_response()
}

/// Toggle a pet in the user's favorites.
#[instrument(skip(state, _user, token))]
pub async fn favorite(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    BearerToken(token): BearerToken,
    Path(id): Path<PetId>,
) -> Response {
    if let Err(e) = state.api().toggle_favorite(&token, &id).await {
        tracing::warn!("Failed to toggle favorite: {e}");
    }
    Redirect::to(&format!("/pets/{id}")).into_response()
}
