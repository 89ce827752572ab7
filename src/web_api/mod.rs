//! WebAPI - REST API Endpoints
//!
//! ## Responsibilities
//!
//! - HTTP API routes
//! - Request validation
//! - Response formatting

mod routes;

pub use routes::create_router;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::models::HealthResponse;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        db_connected,
        classifier_loaded: state.classifier.is_some(),
    };

    Json(response)
}

/// Database connectivity check
pub async fn db_check(State(state): State<AppState>) -> impl IntoResponse {
    if sqlx::query("SELECT 1").execute(&state.pool).await.is_ok() {
        Json(json!({"message": "Successfully connected to MySQL"}))
    } else {
        Json(json!({"message": "Failed to connect to MySQL"}))
    }
}
