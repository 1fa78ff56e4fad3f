//! Process configuration for the forecast API.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use forecast_query::{
    GenQueryBuilder, GfsQueryBuilder, GraphQueryBuilder, ModelRegistry, QueryError, TableId,
};
use std::sync::Arc;
use std::time::Duration;
use warehouse::{
    bigquery::DEFAULT_ENDPOINT, BigQueryConfig, MetadataServerToken, NoAuth, StaticToken,
    TokenProvider,
};

/// How the service obtains BigQuery credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthMode {
    /// GCE/Cloud Run metadata server.
    Metadata,
    /// Fixed bearer token from `--access-token`.
    Token,
    /// No Authorization header (emulators).
    None,
}

/// Forecast API Server
#[derive(Parser, Debug, Clone)]
#[command(name = "forecast-api")]
#[command(about = "Point forecast API over WeatherNext and GFS tables in BigQuery")]
pub struct ServiceConfig {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "FORECAST_LISTEN_ADDR")]
    pub listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "FORECAST_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Project the WeatherNext datasets are shared into
    #[arg(long, env = "GCP_PROJECT_ID")]
    pub project_id: String,

    /// Project that runs query jobs (defaults to --project-id)
    #[arg(long, env = "BIGQUERY_BILLING_PROJECT")]
    pub billing_project: Option<String>,

    /// BigQuery REST endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT, env = "BIGQUERY_ENDPOINT")]
    pub bigquery_endpoint: String,

    /// Dataset location, e.g. US
    #[arg(long, env = "BIGQUERY_LOCATION")]
    pub bigquery_location: Option<String>,

    /// Credential source
    #[arg(long, value_enum, default_value_t = AuthMode::Metadata, env = "BIGQUERY_AUTH")]
    pub auth: AuthMode,

    /// Bearer token used with --auth token
    #[arg(long, env = "BIGQUERY_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Server-side wait per BigQuery call, in milliseconds
    #[arg(long, default_value_t = 10_000, env = "BIGQUERY_QUERY_TIMEOUT_MS")]
    pub query_timeout_ms: u64,

    /// Client-side limit per HTTP exchange, in seconds
    #[arg(long, env = "BIGQUERY_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Override the graph table (project.dataset.table)
    #[arg(long, env = "FORECAST_GRAPH_TABLE")]
    pub graph_table: Option<TableId>,

    /// Override the gen table (project.dataset.table)
    #[arg(long, env = "FORECAST_GEN_TABLE")]
    pub gen_table: Option<TableId>,

    /// Override the gfs table (project.dataset.table)
    #[arg(long, env = "FORECAST_GFS_TABLE")]
    pub gfs_table: Option<TableId>,
}

impl ServiceConfig {
    /// Model registry with any configured table overrides applied.
    pub fn registry(&self) -> Result<ModelRegistry, QueryError> {
        let mut registry = ModelRegistry::new(&self.project_id)?;
        if let Some(table) = &self.graph_table {
            registry = registry.register(GraphQueryBuilder::with_table(table.clone()));
        }
        if let Some(table) = &self.gen_table {
            registry = registry.register(GenQueryBuilder::with_table(table.clone()));
        }
        if let Some(table) = &self.gfs_table {
            registry = registry.register(GfsQueryBuilder::with_table(table.clone()));
        }
        Ok(registry)
    }

    pub fn bigquery_config(&self) -> BigQueryConfig {
        let billing = self
            .billing_project
            .clone()
            .unwrap_or_else(|| self.project_id.clone());

        let mut config = BigQueryConfig::new(billing)
            .with_endpoint(self.bigquery_endpoint.as_str())
            .with_location(self.bigquery_location.clone());
        config.query_timeout_ms = self.query_timeout_ms;
        config.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        config
    }

    pub fn token_provider(&self) -> Result<Arc<dyn TokenProvider>> {
        let provider: Arc<dyn TokenProvider> = match self.auth {
            AuthMode::Metadata => Arc::new(MetadataServerToken::new(reqwest::Client::new())),
            AuthMode::Token => match &self.access_token {
                Some(token) if !token.is_empty() => Arc::new(StaticToken::new(token.as_str())),
                _ => bail!("--auth token requires --access-token or BIGQUERY_ACCESS_TOKEN"),
            },
            AuthMode::None => Arc::new(NoAuth),
        };
        Ok(provider)
    }
}
