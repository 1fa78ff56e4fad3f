//! Application state for the forecast API.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;
use warehouse::{BigQueryClient, Warehouse};

use crate::config::ServiceConfig;
use crate::service::ForecastService;

/// Shared application state.
pub struct AppState {
    /// Forecast service holding the model registry and warehouse client.
    pub service: ForecastService,

    /// Prometheus exporter, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: ForecastService) -> Self {
        Self {
            service,
            prometheus: None,
        }
    }

    /// Build the state from process configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let registry = config
            .registry()
            .context("Invalid table configuration")?;

        let client = BigQueryClient::new(config.bigquery_config(), config.token_provider()?)
            .context("Failed to create BigQuery client")?;
        let warehouse: Arc<dyn Warehouse> = Arc::new(client);

        for model in registry.models() {
            if let Some(builder) = registry.get(model) {
                info!(model = %model, table = %builder.table(), "Registered forecast model");
            }
        }

        Ok(Self::new(ForecastService::new(registry, warehouse)))
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
