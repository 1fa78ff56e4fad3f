//! JSON response bodies.

use forecast_common::{ForecastModel, Value};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Forecast rows for one location and model run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResponse {
    pub init_date: String,
    pub latitude: f64,
    pub longitude: f64,
    pub model: ForecastModel,
    pub forecast: Vec<ForecastRow>,
}

/// One forecast step (and ensemble member, for ensemble models).
///
/// Serialized as a JSON object whose keys follow the select-list order.
/// Missing values are written as explicit `null`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastRow {
    fields: Vec<(String, Value)>,
}

impl ForecastRow {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

impl Serialize for ForecastRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g. `InvalidModel`).
    #[serde(rename = "type")]
    pub type_: String,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code.
    pub status: u16,

    /// Detailed message. Warehouse errors are passed through verbatim.
    pub detail: String,

    /// Models the service accepts, for `InvalidModel` errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_models: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            status,
            detail: detail.into(),
            valid_models: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_valid_models(mut self, models: Vec<String>) -> Self {
        self.valid_models = Some(models);
        self
    }
}

/// Description of a served model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model: ForecastModel,
    pub title: String,
    pub ensemble: bool,
    pub table: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
