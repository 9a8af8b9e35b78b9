//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers. It does
//! not call the model API.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Configured model identifier
    pub model: String,
}

/// Health check handler
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            model: state.client().model_name().to_string(),
        }),
    )
}
