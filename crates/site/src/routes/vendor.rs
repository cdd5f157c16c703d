//! Vendor dashboard route handlers.
//!
//! Vendors manage their own listings and the adoption requests against
//! them. Listing photos and application documents are uploaded to the
//! image host first; only the hosted URL reaches the backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use pet_haven_core::{AdoptionRequest, AdoptionRequestId, Collection, Pet, PetId};

use crate::api::types::{PetBody, VendorApplyBody};
use crate::filters;
use crate::middleware::{BearerToken, RequireAuth, RequireVendor};
use crate::models::CurrentUser;
use crate::state::AppState;

use super::pets::{PetView, SearchQuery};

// =============================================================================
// Views
// =============================================================================

/// Adoption request display data for the vendor dashboard.
#[derive(Debug, Clone)]
pub struct RequestView {
    pub id: String,
    pub pet_name: String,
    pub applicant_name: String,
    pub status: String,
    pub open: bool,
    pub reason: String,
    pub created: String,
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
            created: request
                .created_at
                .map(|at| at.format("%B %-d, %Y").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Editable listing fields, pre-filled on the edit form.
#[derive(Debug, Clone, Default)]
pub struct PetFormView {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: String,
    pub gender: String,
    pub size: String,
    pub description: String,
    pub fee: String,
}

impl From<&Pet> for PetFormView {
    fn from(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            age: pet.age.map(|a| a.to_string()).unwrap_or_default(),
            gender: pet.gender.clone().unwrap_or_default(),
            size: pet.size.clone().unwrap_or_default(),
            description: pet.description.clone(),
            fee: pet
                .adoption_fee
                .map(|fee| fee.amount().to_string())
                .unwrap_or_default(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Vendor dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "vendor/dashboard.html")]
pub struct DashboardTemplate {
    pub user: Option<CurrentUser>,
    pub pet_count: usize,
    pub open_requests: usize,
    pub error: Option<String>,
}

/// Vendor listings template.
#[derive(Template, WebTemplate)]
#[template(path = "vendor/pets.html")]
pub struct VendorPetsTemplate {
    pub user: Option<CurrentUser>,
    pub pets: Vec<PetView>,
    pub search_query: String,
    pub error: Option<String>,
}

/// New/edit listing form template.
#[derive(Template, WebTemplate)]
#[template(path = "vendor/pet_form.html")]
pub struct PetFormTemplate {
    pub user: Option<CurrentUser>,
    pub heading: String,
    pub action: String,
    pub form: PetFormView,
    pub error: Option<String>,
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "vendor/pet_delete.html")]
pub struct PetDeleteTemplate {
    pub user: Option<CurrentUser>,
    pub pet: PetView,
}

/// Adoption requests template.
#[derive(Template, WebTemplate)]
#[template(path = "vendor/requests.html")]
pub struct RequestsTemplate {
    pub user: Option<CurrentUser>,
    pub requests: Vec<RequestView>,
    pub search_query: String,
    pub error: Option<String>,
}

/// Vendor application template.
#[derive(Template, WebTemplate)]
#[template(path = "vendor/apply.html")]
pub struct ApplyTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Display the vendor dashboard with listing and request counts.
#[instrument(skip(state, user, token))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireVendor(user): RequireVendor,
    BearerToken(token): BearerToken,
) -> impl IntoResponse {
    let pets = state.api().my_pets(&token).await;
    let requests = state.api().adoption_requests(&token).await;

    let error = match (&pets, &requests) {
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Failed to load vendor dashboard: {e}");
            Some(e.user_message())
        }
        _ => None,
    };

    DashboardTemplate {
        user: Some(user),
        pet_count: pets.map(|p| p.len()).unwrap_or_default(),
        open_requests: requests
            .map(|r| r.iter().filter(|req| req.is_open()).count())
            .unwrap_or_default(),
        error,
    }
}

// =============================================================================
// Listings
// =============================================================================

/// Display the vendor's own listings with name/species/breed search.
#[instrument(skip(state, user, token))]
pub async fn pets_index(
    State(state): State<AppState>,
    RequireVendor(user): RequireVendor,
    BearerToken(token): BearerToken,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search_query = query.q.unwrap_or_default();

    let (pets, error) = match state.api().my_pets(&token).await {
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
            tracing::error!("Failed to fetch vendor listings: {e}");
            (vec![], Some(e.user_message()))
        }
    };

    VendorPetsTemplate {
        user: Some(user),
        pets,
        search_query,
        error,
    }
}

/// Display the new listing form.
pub async fn new_pet_page(RequireVendor(user): RequireVendor) -> impl IntoResponse {
    PetFormTemplate {
        user: Some(user),
        heading: "Add a pet".to_string(),
        action: "/vendor/pets".to_string(),
        form: PetFormView::default(),
        error: None,
    }
}

/// Display the edit listing form.
#[instrument(skip(state, user, token))]
pub async fn edit_pet_page(
    State(state): State<AppState>,
    RequireVendor(user): RequireVendor,
    BearerToken(token): BearerToken,
    Path(id): Path<PetId>,
) -> Response {
    let pets = match state.api().my_pets(&token).await {
        Ok(pets) => pets,
        Err(e) => {
            tracing::error!("Failed to fetch vendor listings: {e}");
            return Redirect::to("/vendor/pets").into_response();
        }
    };

    let Some(pet) = pets.iter().find(|pet| pet.id == id) else {
        return Redirect::to("/vendor/pets").into_response();
    };

    PetFormTemplate {
        user: Some(user),
        heading: format!("Edit {}", pet.name),
        action: format!("/vendor/pets/{id}"),
        form: PetFormView::from(pet),
        error: None,
    }
    .into_response()
}

/// Fields collected from the multipart listing form.
#[derive(Debug, Default)]
struct PetFormData {
    name: String,
    species: String,
    breed: String,
    age: Option<u8>,
    gender: Option<String>,
    size: Option<String>,
    description: String,
    fee: Option<String>,
    photo: Option<UploadedFile>,
}

/// A file pulled out of a multipart form.
#[derive(Debug)]
struct UploadedFile {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Collect the listing form out of a multipart body.
async fn read_pet_form(multipart: &mut Multipart) -> Result<PetFormData, String> {
    let mut form = PetFormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("invalid form data: {e}"))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        match name.as_str() {
            "photo" => {
                let file_name = field.file_name().unwrap_or("photo").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("failed to read photo: {e}"))?
                    .to_vec();
                if !bytes.is_empty() {
                    form.photo = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("failed to read field: {e}"))?
                    .trim()
                    .to_owned();
                match other {
                    "name" => form.name = value,
                    "species" => form.species = value,
                    "breed" => form.breed = value,
                    "age" => form.age = value.parse().ok(),
                    "gender" if !value.is_empty() => form.gender = Some(value),
                    "size" if !value.is_empty() => form.size = Some(value),
                    "description" => form.description = value,
                    "fee" if !value.is_empty() => form.fee = Some(value),
                    _ => {}
                }
            }
        }
    }

    if form.name.is_empty() || form.species.is_empty() || form.breed.is_empty() {
        return Err("Name, species, and breed are required.".to_string());
    }

    Ok(form)
}

/// Upload the photo (when present) and submit the listing to the backend.
async fn submit_pet(
    state: &AppState,
    token: &str,
    id: Option<&PetId>,
    form: PetFormData,
) -> Result<(), String> {
    let image_url = match form.photo {
        Some(photo) => Some(
            state
                .uploader()
                .upload(&photo.file_name, &photo.content_type, photo.bytes)
                .await
                .map_err(|e| {
                    tracing::error!("Photo upload failed: {e}");
                    "Photo upload failed. Please try again.".to_string()
                })?,
        ),
        None => None,
    };

    let body = PetBody {
        name: &form.name,
        species: &form.species,
        breed: &form.breed,
        age: form.age,
        gender: form.gender.as_deref(),
        size: form.size.as_deref(),
        description: &form.description,
        image_url: image_url.as_deref(),
        adoption_fee: form.fee.as_deref(),
    };

    let result = match id {
        Some(id) => state.api().update_pet(token, id, &body).await,
        None => state.api().add_pet(token, &body).await,
    };

    result.map(|_| ()).map_err(|e| {
        tracing::warn!("Listing submission failed: {e}");
        e.user_message()
    })
}

/// Create a listing.
#[instrument(skip_all)]
pub async fn create_pet(
    State(state): State<AppState>,
    RequireVendor(user): RequireVendor,
    BearerToken(token): BearerToken,
    mut multipart: Multipart,
) -> Response {
    let form = match read_pet_form(&mut multipart).await {
        Ok(form) => form,
        Err(error) => {
            return PetFormTemplate {
                user: Some(user),
                heading: "Add a pet".to_string(),
                action: "/vendor/pets".to_string(),
                form: PetFormView::default(),
                error: Some(error),
            }
            .into_response();
        }
    };

    match submit_pet(&state, &token, None, form).await {
        Ok(()) => Redirect::to("/vendor/pets").into_response(),
        Err(error) => PetFormTemplate {
            user: Some(user),
            heading: "Add a pet".to_string(),
            action: "/vendor/pets".to_string(),
            form: PetFormView::default(),
            error: Some(error),
        }
        .into_response(),
    }
}

/// Update a listing.
#[instrument(skip_all, fields(pet_id = %id))]
pub async fn update_pet(
    State(state): State<AppState>,
    RequireVendor(user): RequireVendor,
    BearerToken(token): BearerToken,
    Path(id): Path<PetId>,
    mut multipart: Multipart,
) -> Response {
    let form = match read_pet_form(&mut multipart).await {
        Ok(form) => form,
        Err(error) => {
            return PetFormTemplate {
                user: Some(user),
                heading: "Edit listing".to_string(),
                action: format!("/vendor/pets/{id}"),
                form: PetFormView::default(),
                error: Some(error),
            }
            .into_response();
        }
    };

    match submit_pet(&state, &token, Some(&id), form).await {
        Ok(()) => Redirect::to("/vendor/pets").into_response(),
        Err(error) => PetFormTemplate {
            user: Some(user),
            heading: "Edit listing".to_string(),
            action: format!("/vendor/pets/{id}"),
            form: PetFormView::default(),
            error: Some(error),
        }
        .into_response(),
    }
}

/// Display the delete confirmation page. Deleting a listing is
/// irreversible, so it never fires from a bare link.
#[instrument(skip(state, user, token))]
pub async fn delete_pet_page(
    State(state): State<AppState>,
    RequireVendor(user): RequireVendor,
    BearerToken(token): BearerToken,
    Path(id): Path<PetId>,
) -> Response {
    let pets = match state.api().my_pets(&token).await {
        Ok(pets) => pets,
        Err(e) => {
            tracing::error!("Failed to fetch vendor listings: {e}");
            return Redirect::to("/vendor/pets").into_response();
        }
    };

    let Some(pet) = pets.iter().find(|pet| pet.id == id) else {
        return Redirect::to("/vendor/pets").into_response();
    };

    PetDeleteTemplate {
        user: Some(user),
        pet: PetView::from(pet),
    }
    .into_response()
}

/// Delete a listing after confirmation.
#[instrument(skip(state, _user, token))]
pub async fn delete_pet(
    State(state): State<AppState>,
    RequireVendor(_user): RequireVendor,
    BearerToken(token): BearerToken,
    Path(id): Path<PetId>,
) -> Response {
    if let Err(e) = state.api().delete_pet(&token, &id).await {
        tracing::warn!("Failed to delete listing: {e}");
    }
    Redirect::to("/vendor/pets").into_response()
}

// =============================================================================
// Adoption requests
// =============================================================================

/// Display adoption requests with pet/applicant search.
#[instrument(skip(state, user, token))]
pub async fn requests_index(
    State(state): State<AppState>,
    RequireVendor(user): RequireVendor,
    BearerToken(token): BearerToken,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search_query = query.q.unwrap_or_default();

    let (requests, error) = match state.api().adoption_requests(&token).await {
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

    RequestsTemplate {
        user: Some(user),
        requests,
        search_query,
        error,
    }
}

/// Approve an adoption request. Fires immediately; approval is the happy
/// path and reversible on the backend.
#[instrument(skip(state, _user, token))]
pub async fn approve_request(
    State(state): State<AppState>,
    RequireVendor(_user): RequireVendor,
    BearerToken(token): BearerToken,
    Path(id): Path<AdoptionRequestId>,
) -> Response {
    if let Err(e) = state.api().approve_request(&token, &id).await {
        tracing::warn!("Failed to approve adoption request: {e}");
    }
    Redirect::to("/vendor/requests").into_response()
}

/// Rejection form data.
#[derive(Debug, Deserialize)]
pub struct RejectForm {
    pub reason: String,
}

/// Reject an adoption request with a written reason.
#[instrument(skip(state, _user, token, form))]
pub async fn reject_request(
    State(state): State<AppState>,
    RequireVendor(_user): RequireVendor,
    BearerToken(token): BearerToken,
    Path(id): Path<AdoptionRequestId>,
    Form(form): Form<RejectForm>,
) -> Response {
    let reason = form.reason.trim();
    if reason.is_empty() {
        return Redirect::to("/vendor/requests").into_response();
    }

    if let Err(e) = state.api().reject_request(&token, &id, reason).await {
        tracing::warn!("Failed to reject adoption request: {e}");
    }
    Redirect::to("/vendor/requests").into_response()
}

// =============================================================================
// Vendor application
// =============================================================================

/// Display the vendor application form. Any logged-in account may apply.
pub async fn apply_page(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    ApplyTemplate {
        user: Some(user),
        error: None,
    }
}

/// Fields collected from the multipart application form.
#[derive(Debug, Default)]
struct ApplyFormData {
    organization_name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    document: Option<UploadedFile>,
}

/// Submit a vendor application: upload the verification document, then
/// file the application with the backend.
#[instrument(skip_all)]
pub async fn apply(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    BearerToken(token): BearerToken,
    mut multipart: Multipart,
) -> Response {
    let mut form = ApplyFormData::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return ApplyTemplate {
                    user: Some(user),
                    error: Some(format!("invalid form data: {e}")),
                }
                .into_response();
            }
        };

        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        if name == "document" {
            let file_name = field.file_name().unwrap_or("document").to_owned();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            if let Ok(bytes) = field.bytes().await
                && !bytes.is_empty()
            {
                form.document = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else if let Ok(value) = field.text().await {
            let value = value.trim().to_owned();
            match name.as_str() {
                "organization_name" => form.organization_name = value,
                "email" => form.email = value,
                "phone" if !value.is_empty() => form.phone = Some(value),
                "address" if !value.is_empty() => form.address = Some(value),
                _ => {}
            }
        }
    }

    if form.organization_name.is_empty() || form.email.is_empty() {
        return ApplyTemplate {
            user: Some(user),
            error: Some("Organization name and contact email are required.".to_string()),
        }
        .into_response();
    }

    let document_url = match form.document {
        Some(document) => match state
            .uploader()
            .upload(&document.file_name, &document.content_type, document.bytes)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!("Document upload failed: {e}");
                return ApplyTemplate {
                    user: Some(user),
                    error: Some("Document upload failed. Please try again.".to_string()),
                }
                .into_response();
            }
        },
        None => None,
    };

    let body = VendorApplyBody {
        organization_name: &form.organization_name,
        email: &form.email,
        phone: form.phone.as_deref(),
        address: form.address.as_deref(),
        document_url: document_url.as_deref(),
    };

    match state.api().apply_vendor(&token, &body).await {
        Ok(()) => Redirect::to("/account?success=applied").into_response(),
        Err(e) => {
            tracing::warn!("Vendor application failed: {e}");
            ApplyTemplate {
                user: Some(user),
                error: Some(e.user_message()),
            }
            .into_response()
        }
    }
}
