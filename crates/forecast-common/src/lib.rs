//! Common types shared across the forecast query crates and services.

pub mod model;
pub mod result;
pub mod statement;
pub mod value;

pub use model::{ForecastModel, UnknownModel};
pub use result::{Column, ColumnType, ResultSet};
pub use statement::{ParameterValue, QueryParameter, Statement};
pub use value::Value;

/// Name of the column carrying the forecast valid time in every catalog.
pub const FORECAST_TIME_FIELD: &str = "forecast_time";
