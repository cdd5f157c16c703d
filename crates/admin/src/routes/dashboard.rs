//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use pet_haven_core::VendorStatus;

use crate::api::AdminApiError;
use crate::filters;
use crate::middleware::{AdminToken, RequireAdminAuth};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Admin identity view shared by every panel template.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
        }
    }
}

/// Render a template, logging failures and degrading to a bare 500 body.
pub fn render_or_500<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub user_count: usize,
    pub pet_count: usize,
    pub pending_vendors: usize,
    pub open_requests: usize,
    pub error: Option<String>,
}

/// Dashboard page handler: headline counts across the marketplace.
#[instrument(skip(admin, token, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
) -> Html<String> {
    let mut error: Option<String> = None;
    let mut note_error = |e: &AdminApiError| {
        tracing::error!("Failed to load dashboard data: {e}");
        if error.is_none() {
            error = Some(e.user_message());
        }
    };

    let user_count = match state.users().refresh(state.api(), &token, false).await {
        Ok(()) => state.users().len().await,
        Err(e) => {
            note_error(&e);
            0
        }
    };

    let pet_count = match state.api().all_pets(&token).await {
        Ok(pets) => pets.len(),
        Err(e) => {
            note_error(&e);
            0
        }
    };

    let pending_vendors = match state.api().pending_vendors(&token).await {
        Ok(vendors) => vendors
            .iter()
            .filter(|v| v.status == VendorStatus::Pending)
            .count(),
        Err(e) => {
            note_error(&e);
            0
        }
    };

    let open_requests = match state.api().adoption_requests(&token).await {
        Ok(requests) => requests.iter().filter(|r| r.is_open()).count(),
        Err(e) => {
            note_error(&e);
            0
        }
    };

    let template = DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/dashboard".to_string(),
        user_count,
        pet_count,
        pending_vendors,
        open_requests,
        error,
    };

    render_or_500(&template)
}
