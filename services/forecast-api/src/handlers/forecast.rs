//! Forecast query handler.

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};
use forecast_common::ForecastModel;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ForecastError;
use crate::response::ForecastResponse;
use crate::service::ForecastRequest;
use crate::state::AppState;

/// Query parameters for the forecast endpoint.
///
/// Everything is taken as text so that malformed values produce the same
/// JSON error body as every other failure.
#[derive(Debug, Deserialize)]
pub struct ForecastQueryParams {
    /// Forecast initialization date (YYYY-MM-DD). Required.
    pub init_date: Option<String>,

    /// Latitude in degrees. Required.
    pub lat: Option<String>,

    /// Longitude in degrees. Required.
    pub lon: Option<String>,

    /// Forecast model; defaults to `graph`.
    pub model: Option<String>,

    /// Comma-separated variable names to return.
    pub variables: Option<String>,
}

impl ForecastQueryParams {
    fn into_request(self) -> Result<ForecastRequest, ForecastError> {
        let init_date = required("init_date", self.init_date)?;
        let latitude = parse_coordinate("lat", required("lat", self.lat)?)?;
        let longitude = parse_coordinate("lon", required("lon", self.lon)?)?;

        Ok(ForecastRequest {
            init_date,
            latitude,
            longitude,
            model: self
                .model
                .unwrap_or_else(|| ForecastModel::default().as_str().to_string()),
            variables: self.variables,
        })
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, ForecastError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ForecastError::invalid_parameter(
            name,
            "missing required parameter",
        )),
    }
}

fn parse_coordinate(name: &str, raw: String) -> Result<f64, ForecastError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ForecastError::invalid_parameter(name, format!("'{}' is not a number", raw)))
}

/// GET /forecast
pub async fn forecast_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<ForecastQueryParams>, QueryRejection>,
) -> Result<Json<ForecastResponse>, ForecastError> {
    let Query(params) = params
        .map_err(|rejection| ForecastError::invalid_parameter("query", rejection.body_text()))?;
    let request = params.into_request()?;
    let response = state.service.handle(request).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: Option<&str>, model: Option<&str>) -> ForecastQueryParams {
        ForecastQueryParams {
            init_date: Some("2023-04-18".to_string()),
            lat: lat.map(str::to_string),
            lon: Some("-3.703790".to_string()),
            model: model.map(str::to_string),
            variables: None,
        }
    }

    #[test]
    fn test_model_defaults_to_graph() {
        let request = params(Some("40.416775"), None).into_request().unwrap();
        assert_eq!(request.model, "graph");
        assert_eq!(request.latitude, 40.416775);
        assert_eq!(request.longitude, -3.70379);
    }

    #[test]
    fn test_missing_lat() {
        let err = params(None, Some("gfs")).into_request().unwrap_err();
        assert!(err.to_string().contains("'lat'"));
    }

    #[test]
    fn test_unparseable_lat() {
        let err = params(Some("north"), Some("gfs")).into_request().unwrap_err();
        assert!(err.to_string().contains("'north' is not a number"));
    }
}
