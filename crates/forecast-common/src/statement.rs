//! Parameterized SQL statements.

use chrono::NaiveDate;

/// SQL text together with the named parameters it references.
///
/// Parameters are referenced in the text as `@name` and are always bound by
/// the warehouse, never spliced into the SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub parameters: Vec<QueryParameter>,
}

/// A single named query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameter {
    pub name: String,
    pub value: ParameterValue,
}

/// Typed value of a query parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Date(NaiveDate),
    Float64(f64),
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }

    /// Bind a named parameter, replacing any earlier binding of that name.
    pub fn bind(mut self, name: impl Into<String>, value: ParameterValue) -> Self {
        let name = name.into();
        self.parameters.retain(|p| p.name != name);
        self.parameters.push(QueryParameter { name, value });
        self
    }

    /// Look up a bound parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

impl ParameterValue {
    /// Standard SQL type name of the parameter.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Date(_) => "DATE",
            ParameterValue::Float64(_) => "FLOAT64",
        }
    }

    /// Canonical string form used on the wire.
    pub fn to_wire_string(&self) -> String {
        match self {
            ParameterValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            ParameterValue::Float64(v) => v.to_string(),
        }
    }
}
