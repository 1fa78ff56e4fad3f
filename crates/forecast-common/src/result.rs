//! Tabular results returned by the warehouse.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Logical type of a result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    String,
    Timestamp,
    Date,
    Record,
    /// Any type carried through as text (DATETIME, GEOGRAPHY, JSON, ...).
    Other(String),
}

impl ColumnType {
    /// Map a standard or legacy SQL type name onto a column type.
    pub fn from_type_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "INTEGER" | "INT64" => ColumnType::Integer,
            "FLOAT" | "FLOAT64" | "NUMERIC" | "BIGNUMERIC" | "DECIMAL" | "BIGDECIMAL" => {
                ColumnType::Float
            }
            "BOOLEAN" | "BOOL" => ColumnType::Boolean,
            "STRING" => ColumnType::String,
            "TIMESTAMP" => ColumnType::Timestamp,
            "DATE" => ColumnType::Date,
            "RECORD" | "STRUCT" => ColumnType::Record,
            other => ColumnType::Other(other.to_string()),
        }
    }
}

/// A named, typed result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    /// True for REPEATED columns, whose cells are arrays.
    #[serde(default)]
    pub repeated: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            repeated: false,
        }
    }
}

/// Rows returned by a query, each row aligned with `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with nulls, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Stable ascending sort of the rows by the named column.
    ///
    /// Returns `false` without touching the rows when the column is absent.
    pub fn sort_by_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.rows.sort_by(|a, b| a[idx].sort_cmp(&b[idx]));
        true
    }

    /// Apply `f` to every cell in place.
    pub fn map_values(&mut self, f: impl Fn(Value) -> Value) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = f(std::mem::replace(cell, Value::Null));
            }
        }
    }

    pub fn into_parts(self) -> (Vec<Column>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}
