//! Query builder contract and the SQL assembly shared by every model.

use chrono::NaiveDate;
use forecast_common::{ForecastModel, ParameterValue, Statement};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::catalog::VariableCatalog;

/// Name of the bound initialization date parameter.
pub const INIT_DATE_PARAM: &str = "init_date";
/// Name of the bound latitude parameter.
pub const LATITUDE_PARAM: &str = "lat";
/// Name of the bound longitude parameter.
pub const LONGITUDE_PARAM: &str = "lon";

/// Errors raised while building a forecast query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Every requested variable was unknown to the model's catalog.
    #[error("None of the requested variables are available for model '{model}': {}", .requested.join(", "))]
    EmptySelection {
        model: ForecastModel,
        requested: Vec<String>,
    },

    /// A table identifier could not be used in a query.
    #[error("Invalid table identifier '{0}': expected project.dataset.table")]
    InvalidTableId(String),
}

/// Location and run a forecast query targets.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub init_date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    /// Public variable names to select. Empty selects the whole catalog.
    pub variables: Vec<String>,
}

impl QueryRequest {
    pub fn new(init_date: NaiveDate, latitude: f64, longitude: f64) -> Self {
        Self {
            init_date,
            latitude,
            longitude,
            variables: Vec::new(),
        }
    }

    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = variables.into_iter().map(Into::into).collect();
        self
    }
}

/// Builds the warehouse query for one forecast model.
pub trait QueryBuilder: Send + Sync {
    /// Model this builder serves.
    fn model(&self) -> ForecastModel;

    /// Variables the model exposes.
    fn catalog(&self) -> VariableCatalog;

    /// Table the query reads from.
    fn table(&self) -> &TableId;

    /// Render the parameterized statement for a request.
    fn build(&self, request: &QueryRequest) -> Result<Statement, QueryError>;
}

/// Fully-qualified `project.dataset.table` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableId {
    project: String,
    dataset: String,
    table: String,
}

impl TableId {
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let id = Self {
            project: project.into(),
            dataset: dataset.into(),
            table: table.into(),
        };
        let valid = [&id.project, &id.dataset, &id.table]
            .iter()
            .all(|part| is_valid_identifier(part));
        if valid {
            Ok(id)
        } else {
            Err(QueryError::InvalidTableId(id.to_string()))
        }
    }

    /// Identifier assembled from compile-time constants.
    pub(crate) fn from_static(project: &str, dataset: &str, table: &str) -> Self {
        Self {
            project: project.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

// Letters, digits, `_` and `-`. Domain-scoped project ids are not supported.
fn is_valid_identifier(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

impl FromStr for TableId {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        match parts.as_slice() {
            [project, dataset, table] => TableId::new(*project, *dataset, *table),
            _ => Err(QueryError::InvalidTableId(s.to_string())),
        }
    }
}

/// Source clause and filter columns of one model's table layout.
pub(crate) struct SourceLayout<'a> {
    pub from: String,
    pub init_time_column: &'a str,
    pub polygon_column: &'a str,
}

/// Assemble the select list, source and filter into a statement.
pub(crate) fn render(
    model: ForecastModel,
    catalog: VariableCatalog,
    layout: SourceLayout<'_>,
    request: &QueryRequest,
) -> Result<Statement, QueryError> {
    let selected = catalog.select(&request.variables);
    if selected.is_empty() {
        return Err(QueryError::EmptySelection {
            model,
            requested: request.variables.clone(),
        });
    }

    let select_list = selected
        .iter()
        .map(|entry| format!("    {} AS `{}`", entry.expression, entry.name))
        .collect::<Vec<_>>()
        .join(",\n");

    let sql = format!(
        "SELECT\n{select_list}\n{from}\nWHERE\n    DATE({init}) = @{INIT_DATE_PARAM}\n    AND ST_CONTAINS({polygon}, ST_GEOGPOINT(@{LONGITUDE_PARAM}, @{LATITUDE_PARAM}))",
        from = layout.from,
        init = layout.init_time_column,
        polygon = layout.polygon_column,
    );

    debug!(
        model = %model,
        columns = selected.len(),
        dropped = catalog.unknown(&request.variables).len(),
        "Built forecast query"
    );

    Ok(Statement::new(sql)
        .bind(INIT_DATE_PARAM, ParameterValue::Date(request.init_date))
        .bind(LATITUDE_PARAM, ParameterValue::Float64(request.latitude))
        .bind(LONGITUDE_PARAM, ParameterValue::Float64(request.longitude)))
}
