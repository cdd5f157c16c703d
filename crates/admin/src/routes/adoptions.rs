//! Adoption oversight route handlers.
//!
//! Admins can decide any request, not just a single vendor's; the
//! endpoints are otherwise the vendor dashboard's.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use pet_haven_core::{AdoptionRequest, AdoptionRequestId, Collection};

use crate::filters;
use crate::middleware::{AdminToken, RequireAdminAuth};
use crate::state::AppState;

use super::dashboard::{AdminUserView, render_or_500};

/// Adoption request display data.
#[derive(Debug, Clone)]
pub struct RequestView {
    pub id: String,
    pub pet_name: String,
    pub applicant_name: String,
    pub status: String,
    pub open: bool,
    pub reason: String,
}

impl From<&AdoptionRequest> for RequestView {
    fn from(request: &AdoptionRequest) -> Self {
        Self {
            id: request.id.to_string(),
            pet_name: request.pet_name.clone(),
            applicant_name: request.applicant_name.clone(),
            status: request.status.to_string(),
            open: request.is_open(),
            reason: request.reason.clone().unwrap_or_default(),
        }
    }
}

/// Query parameters for the oversight page.
#[derive(Debug, Deserialize)]
pub struct AdoptionsQuery {
    pub q: Option<String>,
    pub error: Option<String>,
}

/// Adoption oversight page template.
#[derive(Template)]
#[template(path = "adoptions/index.html")]
pub struct AdoptionsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub requests: Vec<RequestView>,
    pub search_query: String,
    pub error: Option<String>,
}

/// Adoption oversight page handler with pet/applicant search.
#[instrument(skip(admin, token, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    State(state): State<AppState>,
    Query(query): Query<AdoptionsQuery>,
) -> Html<String> {
    let search_query = query.q.unwrap_or_default();

    let (requests, fetch_error) = match state.api().adoption_requests(&token).await {
        Ok(requests) => {
            let collection = Collection::from_items(requests);
            let filtered = collection
                .filter(&search_query, |request: &AdoptionRequest| {
                    vec![&request.pet_name, &request.applicant_name]
                })
                .into_iter()
                .map(RequestView::from)
                .collect();
            (filtered, None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch adoption requests: {e}");
            (vec![], Some(e.user_message()))
        }
    };

    let template = AdoptionsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/adoptions".to_string(),
        requests,
        search_query,
        error: query.error.or(fetch_error),
    };

    render_or_500(&template)
}

/// Approve an adoption request.
#[instrument(skip(state, _admin, token))]
pub async fn approve(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<AdoptionRequestId>,
) -> Response {
    match state.api().approve_adoption(&token, &id).await {
        Ok(()) => Redirect::to("/adoptions").into_response(),
        Err(e) => {
            tracing::warn!("Adoption approval failed: {e}");
            Redirect::to(&format!(
                "/adoptions?error={}",
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

/// Reject an adoption request with a written reason.
#[instrument(skip(state, _admin, token, form))]
pub async fn reject(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    AdminToken(token): AdminToken,
    Path(id): Path<AdoptionRequestId>,
    Form(form): Form<RejectForm>,
) -> Response {
    let reason = form.reason.trim();
    if reason.is_empty() {
        return Redirect::to("/adoptions?error=A%20rejection%20reason%20is%20required.")
            .into_response();
    }

    match state.api().reject_adoption(&token, &id, reason).await {
        Ok(()) => Redirect::to("/adoptions").into_response(),
        Err(e) => {
            tracing::warn!("Adoption rejection failed: {e}");
            Redirect::to(&format!(
                "/adoptions?error={}",
                urlencoding::encode(&e.user_message())
            ))
            .into_response()
        }
    }
}
