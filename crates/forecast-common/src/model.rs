//! Supported forecast models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A forecast model exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastModel {
    /// WeatherNext Graph, deterministic graph neural network forecasts.
    #[default]
    Graph,
    /// WeatherNext Gen, generative ensemble forecasts.
    Gen,
    /// NOAA Global Forecast System at 0.25 degrees.
    Gfs,
}

/// Error returned when a model name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown forecast model: {0}")]
pub struct UnknownModel(pub String);

impl ForecastModel {
    /// Every model, in the order they are advertised.
    pub const ALL: [ForecastModel; 3] = [ForecastModel::Graph, ForecastModel::Gen, ForecastModel::Gfs];

    /// Identifier used in requests and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastModel::Graph => "graph",
            ForecastModel::Gen => "gen",
            ForecastModel::Gfs => "gfs",
        }
    }

    /// Identifiers of every model.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.as_str()).collect()
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            ForecastModel::Graph => "WeatherNext Graph",
            ForecastModel::Gen => "WeatherNext Gen",
            ForecastModel::Gfs => "NOAA GFS 0.25\u{b0}",
        }
    }

    /// Whether the model produces several ensemble members per run.
    pub fn is_ensemble(&self) -> bool {
        matches!(self, ForecastModel::Gen)
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}
