//! HTTP request handlers for the qagen web API

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use crate::models::ModelClient;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod generate;
pub mod health;
pub mod json;
pub mod metrics;
pub mod pages;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers. Nothing in
/// here is mutated per request apart from the metric counters.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    client: Arc<dyn ModelClient>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState from configuration and a model client
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics registry cannot be created.
    pub fn new(config: Arc<Config>, client: Arc<dyn ModelClient>) -> AppResult<Self> {
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to create metrics: {}", e)))?;

        Ok(Self {
            config,
            client,
            metrics: Arc::new(metrics),
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the model client
    pub fn client(&self) -> &dyn ModelClient {
        self.client.as_ref()
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the application router with every route and middleware layer
pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().assets.static_dir);

    Router::new()
        .route("/", get(pages::index))
        .route("/response", get(pages::response))
        .route("/generate_response", post(generate::handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .nest_service("/static", static_dir)
        .with_state(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
