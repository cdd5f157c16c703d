//! Account route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::filters;
use crate::middleware::{BearerToken, RequireAuth};
use crate::models::CurrentUser;
use crate::state::AppState;

use super::auth::MessageQuery;
use super::pets::PetView;

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub user: Option<CurrentUser>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
    pub favorites: Vec<PetView>,
    pub adopted: Vec<PetView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the account overview: profile, favorites, adopted pets.
///
/// The profile is re-fetched so favorites reflect the latest toggles; on
/// failure the session identity still renders with an error banner.
#[instrument(skip(state, user, token))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    BearerToken(token): BearerToken,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    if let Err(e) = state.pets().refresh(state.api(), false).await {
        tracing::error!("Failed to refresh pet list: {e}");
    }

    let (favorites, adopted, error) = match state.api().profile(&token).await {
        Ok(profile) => {
            let favorites = state.pets().by_ids(&profile.favorite_pets).await;
            let adopted = state.pets().by_ids(&profile.adopted_pets).await;
            (favorites, adopted, None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile: {e}");
            (vec![], vec![], Some(e.user_message()))
        }
    };

    let success = query.success.as_deref().map(|code| match code {
        "verified" => "Your email address is verified.".to_string(),
        "requested" => "Adoption request submitted. The shelter will be in touch.".to_string(),
        "applied" => "Vendor application submitted. We'll email you once it's reviewed.".to_string(),
        other => other.to_string(),
    });

    AccountTemplate {
        name: user.name.clone(),
        email: user.email.to_string(),
        role: user.role.to_string(),
        verified: user.verified,
        user: Some(user),
        favorites: favorites.iter().map(PetView::from).collect(),
        adopted: adopted.iter().map(PetView::from).collect(),
        error,
        success,
    }
}
