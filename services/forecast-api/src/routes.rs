//! Route table.

use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/forecast", get(handlers::forecast::forecast_handler))
        .route("/models", get(handlers::models::list_models_handler))
        .route("/models/:model", get(handlers::models::get_model_handler))
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .layer(Extension(state))
}
