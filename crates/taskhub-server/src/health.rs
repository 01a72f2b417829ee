use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use taskhub_config::Environment;

/// Health check handler
pub async fn health_handler(State(environment): State<Environment>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": jiff::Timestamp::now().to_string(),
        "environment": environment.as_str(),
    }))
}
