//! Blog management route handlers.

use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use pet_haven_core::{BlogId, BlogPost, Collection};

use crate::api::types::NewBlogBody;
use crate::filters;
use crate::middleware::{AdminToken, RequireAdminAuth};
use crate::state::AppState;

use super::dashboard::{AdminUserView, render_or_500};

/// Blog post display data.
#[derive(Debug, Clone)]
pub struct BlogView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub published: String,
}

impl From<&BlogPost> for BlogView {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            author: post.author.clone(),
            category: post.category.clone(),
            published: post
                .created_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Query parameters for the blog list page.
#[derive(Debug, Deserialize)]
pub struct BlogsQuery {
    pub q: Option<String>,
    pub error: Option<String>,
}

/// Blog list page template.
#[derive(Template)]
#[template(path = "blogs/index.html")]
pub struct BlogsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub blogs: Vec<BlogView>,
    pub search_query: String,
    pub error: Option<String>,
}

/// New post form template.
#[derive(Template)]
#[template(path = "blogs/new.html")]
pub struct NewBlogTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub error: Option<String>,
}

/// Delete confirmation template.
#[derive(Template)]
#[template(path = "blogs/delete.html")]
pub struct BlogDeleteTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub blog: BlogView,
}

/// Blog list page handler with title/author/category search.
#[instrument(skip(admin, token, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
    Query(query): Query<BlogsQuery>,
) -> Html<String> {
    let search_query = query.q.unwrap_or_default();

    let (blogs, fetch_error) = match state.api().blogs(&token).await {
        Ok(posts) => {
            let collection = Collection::from_items(posts);
            let filtered = collection
                .filter(&search_query, |post: &BlogPost| {
                    vec![&post.title, &post.author, &post.category]
                })
                .into_iter()
                .map(BlogView::from)
                .collect();
            (filtered, None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch blog posts: {e}");
            (vec![], Some(e.user_message()))
        }
    };

    let template = BlogsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/blogs".to_string(),
        blogs,
        search_query,
        error: query.error.or(fetch_error),
    };

    render_or_500(&template)
}

/// Display the new post form.
pub async fn new_page(RequireAdminAuth(admin): RequireAdminAuth) -> Html<String> {
    let template = NewBlogTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/blogs".to_string(),
        error: None,
    };
    render_or_500(&template)
}

/// Fields collected from the multipart new-post form.
#[derive(Debug, Default)]
struct BlogFormData {
    title: String,
    author: String,
    category: String,
    content: String,
    image: Option<(String, String, Vec<u8>)>,
}

/// Create a blog post: upload the cover (when attached), then file the
/// post with the backend.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    mut multipart: Multipart,
) -> Response {
    let render_error = |error: String| {
        let template = NewBlogTemplate {
            admin_user: AdminUserView::from(&admin),
            current_path: "/blogs".to_string(),
            error: Some(error),
        };
        render_or_500(&template).into_response()
    };

    let mut form = BlogFormData::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return render_error(format!("invalid form data: {e}")),
        };

        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or("cover").to_owned();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            if let Ok(bytes) = field.bytes().await
                && !bytes.is_empty()
            {
                form.image = Some((file_name, content_type, bytes.to_vec()));
            }
        } else if let Ok(value) = field.text().await {
            let value = value.trim().to_owned();
            match name.as_str() {
                "title" => form.title = value,
                "author" => form.author = value,
                "category" => form.category = value,
                "content" => form.content = value,
                _ => {}
            }
        }
    }

    if form.title.is_empty() || form.content.is_empty() {
        return render_error("Title and content are required.".to_string());
    }

    let image_url = match form.image {
        Some((file_name, content_type, bytes)) => {
            match state.uploader().upload(&file_name, &content_type, bytes).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::error!("Cover upload failed: {e}");
                    return render_error("Cover upload failed. Please try again.".to_string());
                }
            }
        }
        None => None,
    };

    let body = NewBlogBody {
        title: &form.title,
        author: &form.author,
        category: &form.category,
        content: &form.content,
        image_url: image_url.as_deref(),
    };

    match state.api().create_blog(&token, &body).await {
        Ok(_) => Redirect::to("/blogs").into_response(),
        Err(e) => {
            tracing::warn!("Blog create failed: {e}");
            render_error(e.user_message())
        }
    }
}

/// Display the delete confirmation page. Deleting a post is irreversible.
#[instrument(skip(admin, token, state))]
pub async fn delete_page(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
    Path(id): Path<BlogId>,
) -> Response {
    let posts = match state.api().blogs(&token).await {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("Failed to fetch blog posts: {e}");
            return Redirect::to("/blogs").into_response();
        }
    };

    let Some(post) = posts.iter().find(|post| post.id == id) else {
        return Redirect::to("/blogs").into_response();
    };

    let template = BlogDeleteTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/blogs".to_string(),
        blog: BlogView::from(post),
    };

    render_or_500(&template).into_response()
}

/// Delete a post after confirmation.
#[instrument(skip(state, _admin, token))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<BlogId>,
) -> Response {
    match state.api().delete_blog(&token, &id).await {
        Ok(()) => Redirect::to("/blogs").into_response(),
        Err(e) => {
            tracing::warn!("Blog delete failed: {e}");
            Redirect::to(&format!(
                "/blogs?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}
