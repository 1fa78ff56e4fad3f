//! Warehouse access for forecast queries.
//!
//! Provides:
//! - The [`Warehouse`] trait, executing a parameterized statement and
//!   returning a typed [`ResultSet`]
//! - [`BigQueryClient`], an implementation over the BigQuery REST API
//! - Access token providers for the client

pub mod auth;
pub mod bigquery;
pub mod decode;
pub mod error;
pub mod wire;

use async_trait::async_trait;
use forecast_common::{ResultSet, Statement};

pub use auth::{MetadataServerToken, NoAuth, StaticToken, TokenProvider};
pub use bigquery::{BigQueryClient, BigQueryConfig};
pub use error::{WarehouseError, WarehouseResult};

/// A SQL warehouse able to run parameterized statements.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Run `statement` to completion and return every row.
    async fn execute(&self, statement: &Statement) -> WarehouseResult<ResultSet>;
}
