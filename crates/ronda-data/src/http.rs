//! HTTP snapshot provider.

use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use ronda_store::TableKey;

use crate::{DataError, Result, SnapshotProvider, TablePayload};

/// Environment variable holding the service base URL.
pub const API_URL_VAR: &str = "RONDA_API_URL";

/// Environment variable holding the bearer token.
pub const API_TOKEN_VAR: &str = "RONDA_API_TOKEN";

/// Fetches payloads from a data service at `<base>/tables/<dataset>/<field>`.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpProvider {
    /// Create a provider for the service at `base_url`, authenticating with
    /// `token`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Create a provider from `RONDA_API_URL` and `RONDA_API_TOKEN`.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingConfig`] if either variable is not set.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let base_url = env::var(API_URL_VAR).map_err(|_| DataError::MissingConfig(API_URL_VAR))?;
        let token = env::var(API_TOKEN_VAR).map_err(|_| DataError::MissingConfig(API_TOKEN_VAR))?;

        Ok(Self::new(base_url, token))
    }

    /// Service base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, key: TableKey) -> String {
        format!(
            "{}/tables/{}/{}",
            self.base_url,
            key.dataset().as_str(),
            key.field()
        )
    }
}

#[async_trait]
impl SnapshotProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, key: TableKey) -> Result<TablePayload> {
        let url = self.url(key);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(DataError::NotFound(key)),
            StatusCode::TOO_MANY_REQUESTS => return Err(DataError::RateLimited),
            status if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(DataError::Api(format!("HTTP {status}: {text}")));
            }
            _ => {}
        }

        let text = response.text().await?;
        tracing::debug!(table = %key, bytes = text.len(), "fetched payload");
        Ok(serde_json::from_str(&text)?)
    }
}
