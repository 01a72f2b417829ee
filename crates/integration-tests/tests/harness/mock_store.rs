//! In-memory stand-in for the hosted Postgres/auth service
//!
//! Implements just enough of the auth and row APIs for the server to run
//! end to end: password sessions, token verification, and a tasks table
//! filtered the way the row API filters (`id=eq.X`, `user_id=eq.Y`).

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// The one password the mock accepts
pub const PASSWORD: &str = "password123";
/// A token the mock treats as valid for `user-1`
pub const TOKEN: &str = "token-user-1";

pub struct MockStore {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockStoreState>,
}

struct MockStoreState {
    tasks: Mutex<Vec<Value>>,
    next_id: AtomicU32,
    verifications: AtomicU32,
}

impl MockStore {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockStoreState {
            tasks: Mutex::new(Vec::new()),
            next_id: AtomicU32::new(1),
            verifications: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/auth/v1/signup", routing::post(handle_signup))
            .route("/auth/v1/token", routing::post(handle_token))
            .route("/auth/v1/user", routing::get(handle_user))
            .route("/auth/v1/logout", routing::post(handle_logout))
            .route(
                "/rest/v1/tasks",
                routing::get(handle_select)
                    .post(handle_insert)
                    .patch(handle_update)
                    .delete(handle_delete),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Rows currently in the mock tasks table
    pub fn task_count(&self) -> usize {
        self.state.tasks.lock().unwrap().len()
    }

    /// How many times `/auth/v1/user` was actually hit
    pub fn verification_count(&self) -> u32 {
        self.state.verifications.load(Ordering::SeqCst)
    }
}

impl Drop for MockStore {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn user_json() -> Value {
    json!({ "id": "user-1", "email": "alice@example.com" })
}

async fn handle_signup(Json(body): Json<Value>) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default();
    if email == "taken@example.com" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "msg": "User already registered" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": TOKEN,
            "user": { "id": "user-1", "email": email },
        })),
    )
}

async fn handle_token(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"].as_str() == Some(PASSWORD) {
        (
            StatusCode::OK,
            Json(json!({ "access_token": TOKEN, "user": user_json() })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
    }
}

async fn handle_user(State(state): State<Arc<MockStoreState>>, headers: HeaderMap) -> impl IntoResponse {
    state.verifications.fetch_add(1, Ordering::SeqCst);
    if bearer(&headers) == Some(TOKEN) {
        (StatusCode::OK, Json(user_json()))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid JWT" })))
    }
}

async fn handle_logout(headers: HeaderMap) -> StatusCode {
    if bearer(&headers) == Some(TOKEN) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn handle_select(
    State(state): State<Arc<MockStoreState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let tasks = state.tasks.lock().unwrap();
    let rows: Vec<Value> = tasks.iter().filter(|row| matches(row, &params)).cloned().collect();
    Json(Value::Array(rows))
}

async fn handle_insert(
    State(state): State<Arc<MockStoreState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let mut row = json!({
        "id": format!("task-{id}"),
        "title": "",
        "description": "",
        "status": "todo",
        "priority": "medium",
        "due_date": "",
        "tags": [],
        "user_id": "",
        "created_at": "2026-08-29T00:00:00Z",
        "updated_at": "2026-08-29T00:00:00Z",
    });
    merge(&mut row, &body);

    state.tasks.lock().unwrap().push(row.clone());
    Json(Value::Array(vec![row]))
}

async fn handle_update(
    State(state): State<Arc<MockStoreState>>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut tasks = state.tasks.lock().unwrap();
    let mut updated = Vec::new();
    for row in tasks.iter_mut().filter(|row| matches(row, &params)) {
        merge(row, &body);
        updated.push(row.clone());
    }
    Json(Value::Array(updated))
}

async fn handle_delete(
    State(state): State<Arc<MockStoreState>>,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    let mut tasks = state.tasks.lock().unwrap();
    tasks.retain(|row| !matches(row, &params));
    StatusCode::NO_CONTENT
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Apply `column=eq.value` filters the way the row API does
fn matches(row: &Value, params: &HashMap<String, String>) -> bool {
    params.iter().all(|(column, filter)| match filter.strip_prefix("eq.") {
        Some(expected) => row[column].as_str() == Some(expected),
        // Non-filter params like `select` and `order`
        None => true,
    })
}

fn merge(row: &mut Value, patch: &Value) {
    if let (Some(row), Some(patch)) = (row.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
    }
}
