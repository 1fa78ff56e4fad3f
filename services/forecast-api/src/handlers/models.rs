//! Model discovery handlers.

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;

use crate::error::ForecastError;
use crate::response::ModelInfo;
use crate::state::AppState;

/// GET /models
pub async fn list_models_handler(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<ModelInfo>> {
    Json(state.service.models())
}

/// GET /models/:model
pub async fn get_model_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(model): Path<String>,
) -> Result<Json<ModelInfo>, ForecastError> {
    state.service.model(&model).map(Json)
}
