//! Integration tests for PetHaven.
//!
//! The tests in `tests/` drive the real site and admin clients (and the
//! admin's user directory store) against [`StubBackend`], an in-process
//! axum imitation of the adoption backend. No live server or credentials
//! are needed; each test spawns its own stub on an ephemeral port.
//!
//! The stub serves the same `{success, message?, <payload>}` envelopes the
//! real backend does, counts mutation requests so tests can assert on
//! exactly-once semantics, and can be told to fail specific endpoints to
//! exercise rollback paths.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

/// Bearer token the stub hands out on successful login.
pub const STUB_TOKEN: &str = "stub-token-0001";

/// Password the stub accepts for every seeded account.
pub const STUB_PASSWORD: &str = "correct-horse-battery";

/// The one-time code the stub's reset endpoints accept.
pub const STUB_OTP: &str = "482913";

/// Request counters for exactly-once assertions.
#[derive(Debug, Default)]
pub struct Counters {
    pub login_calls: AtomicUsize,
    pub ban_calls: AtomicUsize,
    pub unban_calls: AtomicUsize,
    pub delete_user_calls: AtomicUsize,
    pub all_pets_calls: AtomicUsize,
}

/// Failure switches for exercising rollback paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureModes {
    /// `PUT /api/user/ban` answers 500 instead of mutating.
    pub fail_ban: bool,
    /// `GET /api/pets/all-pets` answers 500.
    pub fail_pets: bool,
}

struct StubState {
    counters: Counters,
    failures: FailureModes,
    users: Mutex<Vec<Value>>,
}

/// An in-process imitation of the adoption backend.
pub struct StubBackend {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubBackend {
    /// Spawn the stub on an ephemeral port with the default fixtures.
    ///
    /// # Panics
    ///
    /// Panics if the ephemeral port cannot be bound; tests cannot proceed
    /// without it.
    pub async fn spawn(failures: FailureModes) -> Self {
        let state = Arc::new(StubState {
            counters: Counters::default(),
            failures,
            users: Mutex::new(seed_users()),
        });

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/is-auth", get(is_auth))
            .route("/api/auth/logout", post(ok_ack))
            .route("/api/auth/send-reset-otp", post(ok_ack))
            .route("/api/auth/verify-reset-otp", post(verify_reset_otp))
            .route("/api/auth/reset-password", post(reset_password))
            .route("/api/pets/all-pets", get(all_pets))
            .route("/api/blogs", get(blogs))
            .route("/api/user", get(users_list))
            .route("/api/user/ban", put(ban_user))
            .route("/api/user/unban", put(unban_user))
            .route("/api/user/delete-user", delete(delete_user))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port for stub backend");
        let addr = listener.local_addr().expect("stub backend local addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL for pointing a client at the stub.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request counters, for exactly-once assertions.
    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.state.counters
    }
}

fn seed_users() -> Vec<Value> {
    vec![
        json!({
            "_id": "u1",
            "name": "Dana Reeves",
            "email": "dana@example.com",
            "role": "user",
            "isAccountVerified": true,
            "banInfo": { "isBanned": false }
        }),
        json!({
            "_id": "u2",
            "name": "Priya Shah",
            "email": "priya@example.com",
            "role": "admin",
            "isAccountVerified": true,
            "banInfo": { "isBanned": false }
        }),
        json!({
            "_id": "u3",
            "name": "Sam Okafor",
            "email": "sam@example.com",
            "role": "vendor",
            "isAccountVerified": false,
            "banInfo": { "isBanned": false }
        }),
    ]
}

fn envelope(mut payload: Value) -> Json<Value> {
    if let Some(map) = payload.as_object_mut() {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Json(payload)
}

fn rejection(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "message": message }))
}

// =============================================================================
// Handlers
// =============================================================================

async fn ok_ack() -> Json<Value> {
    envelope(json!({}))
}

async fn is_auth() -> Json<Value> {
    envelope(json!({}))
}

async fn login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state.counters.login_calls.fetch_add(1, Ordering::SeqCst);

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if email == "banned@example.com" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "success": false,
                "message": "account banned",
                "banInfo": { "isBanned": true, "reason": "spam listings" }
            })),
        )
            .into_response();
    }

    if password != STUB_PASSWORD {
        return rejection("Invalid email or password").into_response();
    }

    let users = state.users.lock().await;
    let Some(user) = users.iter().find(|u| u["email"] == email) else {
        return rejection("Invalid email or password").into_response();
    };

    envelope(json!({ "token": STUB_TOKEN, "userData": user })).into_response()
}

async fn verify_reset_otp(Json(body): Json<Value>) -> Json<Value> {
    if body["otp"].as_str() == Some(STUB_OTP) {
        envelope(json!({}))
    } else {
        rejection("That code is wrong or has expired")
    }
}

async fn reset_password(Json(body): Json<Value>) -> Json<Value> {
    if body["otp"].as_str() != Some(STUB_OTP) {
        return rejection("That code is wrong or has expired");
    }
    if body["newPassword"].as_str().unwrap_or_default().len() < 8 {
        return rejection("Password too weak");
    }
    envelope(json!({}))
}

async fn all_pets(State(state): State<Arc<StubState>>) -> Response {
    state.counters.all_pets_calls.fetch_add(1, Ordering::SeqCst);

    if state.failures.fail_pets {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "boom" })),
        )
            .into_response();
    }

    envelope(json!({
        "pets": [
            {
                "_id": "p1",
                "name": "Golden Retriever",
                "species": "Dog",
                "breed": "Retriever",
                "status": "Available",
                "adoptionFee": "85.00"
            },
            {
                "_id": "p2",
                "name": "Max",
                "species": "Dog",
                "breed": "Golden",
                "status": "Available"
            },
            {
                "_id": "p3",
                "name": "Rex",
                "species": "Dog",
                "breed": "Terrier",
                "status": "Pending",
                "isLocked": true,
                "lockReason": "listing under review"
            }
        ]
    }))
    .into_response()
}

async fn blogs() -> Json<Value> {
    envelope(json!({
        "blogs": [
            {
                "_id": "b1",
                "title": "Settling in a rescue dog",
                "author": "Priya Shah",
                "category": "Care",
                "content": "## The first week\n\nGo slow."
            }
        ]
    }))
}

async fn users_list(State(state): State<Arc<StubState>>) -> Json<Value> {
    let users = state.users.lock().await;
    envelope(json!({ "users": users.clone() }))
}

async fn ban_user(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state.counters.ban_calls.fetch_add(1, Ordering::SeqCst);

    if state.failures.fail_ban {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "boom" })),
        )
            .into_response();
    }

    let user_id = body["userId"].as_str().unwrap_or_default().to_owned();
    let reason = body["reason"].clone();

    let mut users = state.users.lock().await;
    let Some(user) = users.iter_mut().find(|u| u["_id"] == user_id.as_str()) else {
        return rejection("User not found").into_response();
    };

    user["banInfo"] = json!({ "isBanned": true, "reason": reason });
    envelope(json!({ "user": user.clone() })).into_response()
}

async fn unban_user(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state.counters.unban_calls.fetch_add(1, Ordering::SeqCst);

    let user_id = body["userId"].as_str().unwrap_or_default().to_owned();

    let mut users = state.users.lock().await;
    let Some(user) = users.iter_mut().find(|u| u["_id"] == user_id.as_str()) else {
        return rejection("User not found").into_response();
    };

    user["banInfo"] = json!({ "isBanned": false });
    envelope(json!({ "user": user.clone() })).into_response()
}

async fn delete_user(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state
        .counters
        .delete_user_calls
        .fetch_add(1, Ordering::SeqCst);

    let user_id = body["userId"].as_str().unwrap_or_default().to_owned();

    let mut users = state.users.lock().await;
    let before = users.len();
    users.retain(|u| u["_id"] != user_id.as_str());

    if users.len() == before {
        return rejection("User not found").into_response();
    }

    envelope(json!({})).into_response()
}
