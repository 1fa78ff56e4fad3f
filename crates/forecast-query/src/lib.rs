//! Forecast warehouse query construction.
//!
//! Each supported model has a fixed [`VariableCatalog`] mapping public
//! variable names to warehouse column expressions, and a [`QueryBuilder`]
//! that turns a date, location and optional variable subset into a
//! parameterized [`Statement`](forecast_common::Statement).
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use forecast_query::{GfsQueryBuilder, QueryBuilder, QueryRequest};
//!
//! let request = QueryRequest::new(NaiveDate::from_ymd_opt(2023, 4, 18).unwrap(), 40.4, -3.7)
//!     .with_variables(["temperature_2m_above_ground"]);
//! let statement = GfsQueryBuilder::new().build(&request).unwrap();
//! assert!(statement.sql.contains("AS `temperature_2m_above_ground`"));
//! ```

pub mod builder;
pub mod builders;
pub mod catalog;
pub mod registry;

pub use builder::{QueryBuilder, QueryError, QueryRequest, TableId};
pub use builders::{
    GenQueryBuilder, GfsQueryBuilder, GraphQueryBuilder, GEN_CATALOG, GFS_CATALOG, GRAPH_CATALOG,
};
pub use catalog::{CatalogEntry, VariableCatalog};
pub use registry::ModelRegistry;
