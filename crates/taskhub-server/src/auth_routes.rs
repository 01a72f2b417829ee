use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use taskhub_core::{AppError, Violation};
use taskhub_store::Store;

use crate::auth::bearer_token;
use crate::rejection::{Rejection, invalid_body};

/// Session endpoints backed by the hosted auth provider
pub fn auth_router(store: Store) -> Router {
    Router::new()
        .route("/api/auth/register", routing::post(register))
        .route("/api/auth/login", routing::post(login))
        .route("/api/auth/logout", routing::post(logout))
        .with_state(store)
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Handle `POST /api/auth/register`
async fn register(
    State(store): State<Store>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Rejection> {
    let Json(payload) = payload.map_err(|e| invalid_body("Invalid user data", &e))?;

    let mut violations = Vec::new();
    if !payload.email.contains('@') {
        violations.push(Violation::field("email", "must be a valid email address"));
    }
    if payload.password.chars().count() < 8 {
        violations.push(Violation::field("password", "must be at least 8 characters"));
    }
    if payload.name.trim().is_empty() {
        violations.push(Violation::field("name", "must not be empty"));
    }
    if !violations.is_empty() {
        return Err(AppError::validation("Invalid user data", Some(violations)).into());
    }

    let session = store.sign_up(&payload.email, &payload.password, &payload.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "user": session.user, "token": session.token })),
    ))
}

/// Handle `POST /api/auth/login`
async fn login(
    State(store): State<Store>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Rejection> {
    let Json(payload) = payload.map_err(|e| invalid_body("Invalid login data", &e))?;

    let mut violations = Vec::new();
    if !payload.email.contains('@') {
        violations.push(Violation::field("email", "must be a valid email address"));
    }
    if payload.password.is_empty() {
        violations.push(Violation::field("password", "must not be empty"));
    }
    if !violations.is_empty() {
        return Err(AppError::validation("Invalid login data", Some(violations)).into());
    }

    let session = store.sign_in(&payload.email, &payload.password).await?;

    Ok(Json(serde_json::json!({ "user": session.user, "token": session.token })))
}

/// Handle `POST /api/auth/logout`
async fn logout(State(store): State<Store>, headers: HeaderMap) -> Result<impl IntoResponse, Rejection> {
    let token = bearer_token(&headers).ok_or_else(|| AppError::unauthorized("No token provided"))?;

    store.sign_out(token).await?;

    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}
