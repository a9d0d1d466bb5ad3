//! Health check endpoint

use axum::{response::IntoResponse, Json};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "UP",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
