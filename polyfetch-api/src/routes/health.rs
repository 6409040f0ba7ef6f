//! Health check endpoint

use axum::{response::Json, routing::get, Router};
use serde::Serialize;

use super::ApiResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Liveness check, OK whenever the server is running
async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    ApiResponse::ok(HealthResponse { status: "healthy" })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
