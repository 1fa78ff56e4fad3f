//! Forecast API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forecast_query::QueryError;
use thiserror::Error;
use warehouse::WarehouseError;

use crate::response::ErrorResponse;

/// Errors returned by the forecast service.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The requested model is not served.
    #[error("Invalid model type '{requested}'. Available models are: {}", .valid.join(", "))]
    InvalidModel {
        requested: String,
        valid: Vec<String>,
    },

    /// A request parameter is missing or malformed.
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    /// The warehouse failed to run the query.
    #[error("{0}")]
    QueryExecution(String),

    /// The query succeeded but matched no rows.
    #[error("No forecast data found for the specified date and location.")]
    NoDataFound,
}

impl ForecastError {
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        ForecastError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForecastError::InvalidModel { .. } | ForecastError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            ForecastError::NoDataFound => StatusCode::NOT_FOUND,
            ForecastError::QueryExecution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error type.
    pub fn error_type(&self) -> &'static str {
        match self {
            ForecastError::InvalidModel { .. } => "InvalidModel",
            ForecastError::InvalidParameter { .. } => "InvalidParameter",
            ForecastError::QueryExecution(_) => "QueryExecutionError",
            ForecastError::NoDataFound => "NoDataFound",
        }
    }

    /// Short human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            ForecastError::InvalidModel { .. } => "Invalid Model",
            ForecastError::InvalidParameter { .. } => "Invalid Parameter",
            ForecastError::QueryExecution(_) => "Query Execution Error",
            ForecastError::NoDataFound => "No Data Found",
        }
    }

    /// Convert to the JSON error body.
    pub fn to_response_body(&self) -> ErrorResponse {
        let body = ErrorResponse::new(
            self.error_type(),
            self.status_code().as_u16(),
            self.to_string(),
        )
        .with_title(self.title());
        match self {
            ForecastError::InvalidModel { valid, .. } => body.with_valid_models(valid.clone()),
            _ => body,
        }
    }
}

impl From<WarehouseError> for ForecastError {
    fn from(err: WarehouseError) -> Self {
        ForecastError::QueryExecution(err.to_string())
    }
}

impl From<QueryError> for ForecastError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::EmptySelection { .. } => {
                ForecastError::invalid_parameter("variables", err.to_string())
            }
            QueryError::InvalidTableId(_) => ForecastError::QueryExecution(err.to_string()),
        }
    }
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response_body())).into_response()
    }
}
