//! Vendor application route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use pet_haven_core::{VendorApplication, VendorApplicationId, VendorStatus};

use crate::filters;
use crate::middleware::{AdminToken, RequireAdminAuth};
use crate::state::AppState;

use super::dashboard::{AdminUserView, render_or_500};

/// Vendor application display data.
#[derive(Debug, Clone)]
pub struct VendorView {
    pub id: String,
    pub organization_name: String,
    pub email: String,
    pub phone: String,
    pub document_url: Option<String>,
    pub status: String,
    pub pending: bool,
    pub reason: String,
}

impl From<&VendorApplication> for VendorView {
    fn from(app: &VendorApplication) -> Self {
        Self {
            id: app.id.to_string(),
            organization_name: app.organization_name.clone(),
            email: app.email.to_string(),
            phone: app.phone.clone().unwrap_or_default(),
            document_url: app.document_url.clone(),
            status: app.status.to_string(),
            pending: app.status == VendorStatus::Pending,
            reason: app.reason.clone().unwrap_or_default(),
        }
    }
}

/// Query parameters for the applications page.
#[derive(Debug, Deserialize)]
pub struct VendorsQuery {
    /// `pending` narrows to applications awaiting review.
    pub view: Option<String>,
    pub error: Option<String>,
}

/// Vendor applications page template.
#[derive(Template)]
#[template(path = "vendors/index.html")]
pub struct VendorsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub vendors: Vec<VendorView>,
    pub pending_only: bool,
    pub error: Option<String>,
}

/// Vendor applications page handler.
#[instrument(skip(admin, token, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
    Query(query): Query<VendorsQuery>,
) -> Html<String> {
    let pending_only = query.view.as_deref() == Some("pending");

    let result = if pending_only {
        state.api().pending_vendors(&token).await
    } else {
        state.api().vendor_applications(&token).await
    };

    let (vendors, fetch_error) = match result {
        Ok(apps) => (apps.iter().map(VendorView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch vendor applications: {e}");
            (vec![], Some(e.user_message()))
        }
    };

    let template = VendorsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/vendors".to_string(),
        vendors,
        pending_only,
        error: query.error.or(fetch_error),
    };

    render_or_500(&template)
}

/// Approve a vendor application.
#[instrument(skip(state, _admin, token))]
pub async fn approve(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<VendorApplicationId>,
) -> Response {
    match state.api().approve_vendor(&token, &id).await {
        Ok(()) => Redirect::to("/vendors").into_response(),
        Err(e) => {
            tracing::warn!("Vendor approval failed: {e}");
            Redirect::to(&format!(
                "/vendors?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}

/// Rejection form data.
#[derive(Debug, Deserialize)]
pub struct RejectForm {
    pub reason: String,
}

/// Reject a vendor application with a written reason.
#[instrument(skip(state, _admin, token, form))]
pub async fn reject(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<VendorApplicationId>,
    Form(form): Form<RejectForm>,
) -> Response {
    let reason = form.reason.trim();
    if reason.is_empty() {
        return Redirect::to("/vendors?error=A%20rejection%20reason%20is%20required.")
            .into_response();
    }

    match state.api().reject_vendor(&token, &id, reason).await {
        Ok(()) => Redirect::to("/vendors").into_response(),
        Err(e) => {
            tracing::warn!("Vendor rejection failed: {e}");
            Redirect::to(&format!(
                "/vendors?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}
