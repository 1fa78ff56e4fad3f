//! Warehouse error types.

use thiserror::Error;

/// Result type alias using WarehouseError.
pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// Errors raised while executing a warehouse query.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Transport-level failure talking to the warehouse.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The warehouse rejected the request or the query failed.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No access token could be obtained.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The response did not have the expected shape.
    #[error("Failed to decode warehouse response: {0}")]
    Decode(String),
}

impl WarehouseError {
    /// HTTP status reported by the warehouse, when there was one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            WarehouseError::Api { status, .. } => Some(*status),
            WarehouseError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WarehouseError {
    fn from(err: serde_json::Error) -> Self {
        WarehouseError::Decode(err.to_string())
    }
}
