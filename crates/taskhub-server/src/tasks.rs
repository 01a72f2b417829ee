use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json, Router, routing};
use http::StatusCode;
use taskhub_core::{AppError, AuthUser, Violation};
use taskhub_store::{NewTask, Store, Task, TaskPatch};

use crate::auth::auth_middleware;
use crate::rejection::{Rejection, invalid_body};
use crate::request_context::request_context_middleware;

const TITLE_MAX_CHARS: usize = 200;

/// Task CRUD endpoints, bearer-gated
///
/// Authentication runs before the context layer so the captured context
/// carries the verified user.
pub fn tasks_router(store: Store) -> Router {
    let auth_store = store.clone();

    Router::new()
        .route("/api/tasks", routing::post(create_task).get(list_tasks))
        .route(
            "/api/tasks/{id}",
            routing::get(get_task).patch(update_task).delete(delete_task),
        )
        .route_layer(axum::middleware::from_fn(request_context_middleware))
        .route_layer(axum::middleware::from_fn(move |request, next| {
            let store = auth_store.clone();
            async move { auth_middleware(store, request, next).await }
        }))
        .with_state(store)
}

/// Handle `POST /api/tasks`
async fn create_task(
    State(store): State<Store>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<impl IntoResponse, Rejection> {
    let Json(new) = payload.map_err(|e| invalid_body("Invalid task data", &e))?;

    let mut violations = Vec::new();
    if new.title.trim().is_empty() {
        violations.push(Violation::field("title", "must not be empty"));
    } else if new.title.chars().count() > TITLE_MAX_CHARS {
        violations.push(Violation::field("title", "must be at most 200 characters"));
    }
    if new.due_date.trim().is_empty() {
        violations.push(Violation::field("due_date", "must not be empty"));
    }
    if !violations.is_empty() {
        return Err(AppError::validation("Invalid task data", Some(violations)).into());
    }

    let task = store.create_task(&new, &user.id).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Handle `GET /api/tasks`
async fn list_tasks(
    State(store): State<Store>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Task>>, Rejection> {
    let tasks = store.list_tasks(&user.id).await?;
    Ok(Json(tasks))
}

/// Handle `GET /api/tasks/{id}`
async fn get_task(
    State(store): State<Store>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Task>, Rejection> {
    let task = store.get_task(&id, &user.id).await?;
    Ok(Json(task))
}

/// Handle `PATCH /api/tasks/{id}`
async fn update_task(
    State(store): State<Store>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, Rejection> {
    let Json(patch) = payload.map_err(|e| invalid_body("Invalid task data", &e))?;

    let mut violations = Vec::new();
    if patch.is_empty() {
        violations.push(Violation::field("body", "must change at least one field"));
    }
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            violations.push(Violation::field("title", "must not be empty"));
        } else if title.chars().count() > TITLE_MAX_CHARS {
            violations.push(Violation::field("title", "must be at most 200 characters"));
        }
    }
    if !violations.is_empty() {
        return Err(AppError::validation("Invalid task data", Some(violations)).into());
    }

    let task = store.update_task(&id, &user.id, &patch).await?;
    Ok(Json(task))
}

/// Handle `DELETE /api/tasks/{id}`
async fn delete_task(
    State(store): State<Store>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    store.delete_task(&id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
