//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

use super::blog::BlogCardView;
use super::pets::PetView;

/// Number of pets shown in the home page strip.
const FEATURED_COUNT: usize = 4;

/// Number of recent blog posts shown on the home page.
const RECENT_POSTS: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub featured: Vec<PetView>,
    pub posts: Vec<BlogCardView>,
}

/// Display the home page.
///
/// A backend failure renders the page with empty strips rather than an
/// error; the home page is the one place stale emptiness beats a wall.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    if let Err(e) = state.pets().refresh(state.api(), false).await {
        tracing::error!("Failed to refresh pet list: {e}");
    }
    let featured = state.pets().featured(FEATURED_COUNT).await;

    let posts = match state.api().blogs().await {
        Ok(posts) => posts.iter().take(RECENT_POSTS).map(BlogCardView::from).collect(),
        Err(e) => {
            tracing::error!("Failed to fetch blog posts: {e}");
            vec![]
        }
    };

    HomeTemplate {
        user,
        featured: featured.iter().map(PetView::from).collect(),
        posts,
    }
}
