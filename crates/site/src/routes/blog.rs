//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use pet_haven_core::{BlogId, BlogPost, Collection};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Blog card data for list pages.
#[derive(Debug, Clone)]
pub struct BlogCardView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub image_url: Option<String>,
    pub published: String,
}

impl From<&BlogPost> for BlogCardView {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            author: post.author.clone(),
            category: post.category.clone(),
            image_url: post.image_url.clone(),
            published: post
                .created_at
                .map(|at| at.format("%B %-d, %Y").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Blog listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub user: Option<CurrentUser>,
    pub posts: Vec<BlogCardView>,
    pub search_query: String,
    pub error: Option<String>,
}

/// Blog post page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub user: Option<CurrentUser>,
    pub post: BlogCardView,
    /// Post body rendered from markdown; inserted with the safe filter.
    pub content_html: String,
}

/// Display the blog listing page with title/author/category search.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search_query = query.q.unwrap_or_default();

    let (posts, error) = match state.api().blogs().await {
        Ok(posts) => {
            let collection = Collection::from_items(posts);
            let filtered = collection
                .filter(&search_query, |post: &BlogPost| {
                    vec![&post.title, &post.author, &post.category]
                })
                .into_iter()
                .map(BlogCardView::from)
                .collect();
            (filtered, None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch blog posts: {e}");
            (vec![], Some(e.user_message()))
        }
    };

    BlogIndexTemplate {
        user,
        posts,
        search_query,
        error,
    }
}

/// Display a single blog post, markdown rendered server-side.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<BlogId>,
) -> Response {
    let post = match state.api().blog(&id).await {
        Ok(post) => post,
        Err(e) => {
            tracing::warn!("Failed to fetch blog post: {e}");
            return Redirect::to("/blog").into_response();
        }
    };

    let content_html = comrak::markdown_to_html(&post.content, &comrak::Options::default());

    BlogShowTemplate {
        user,
        post: BlogCardView::from(&post),
        content_html,
    }
    .into_response()
}
