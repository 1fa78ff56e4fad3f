//! OAuth access tokens for warehouse requests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::error::{WarehouseError, WarehouseResult};

/// Token endpoint of the GCE/GKE/Cloud Run metadata server.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Supplies bearer tokens for warehouse requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, or `None` to send requests unauthenticated.
    async fn token(&self) -> WarehouseResult<Option<String>>;
}

/// Sends requests without credentials (local emulators).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl TokenProvider for NoAuth {
    async fn token(&self) -> WarehouseResult<Option<String>> {
        Ok(None)
    }
}

/// A fixed, externally managed access token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> WarehouseResult<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Service-account tokens from the instance metadata server, cached until
/// shortly before they expire.
pub struct MetadataServerToken {
    client: reqwest::Client,
    url: String,
    cached: RwLock<Option<CachedToken>>,
}

impl MetadataServerToken {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_url(client, METADATA_TOKEN_URL)
    }

    pub fn with_url(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            cached: RwLock::new(None),
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> WarehouseResult<CachedToken> {
        let response = self
            .client
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| WarehouseError::Auth(format!("metadata server unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(WarehouseError::Auth(format!(
                "metadata server returned {}",
                response.status()
            )));
        }

        let body: MetadataTokenResponse = response
            .json()
            .await
            .map_err(|e| WarehouseError::Auth(format!("invalid token response: {}", e)))?;

        debug!(expires_in = body.expires_in, "Fetched access token");

        Ok(CachedToken {
            token: body.access_token,
            expires_at: Utc::now() + Duration::seconds(body.expires_in - EXPIRY_MARGIN_SECS),
        })
    }
}

#[async_trait]
impl TokenProvider for MetadataServerToken {
    async fn token(&self) -> WarehouseResult<Option<String>> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.expires_at > Utc::now() {
                return Ok(Some(cached.token.clone()));
            }
        }

        let mut slot = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = slot.as_ref() {
            if cached.expires_at > Utc::now() {
                return Ok(Some(cached.token.clone()));
            }
        }

        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *slot = Some(fresh);
        Ok(Some(token))
    }
}
