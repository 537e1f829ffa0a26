//! Search transport
//!
//! `SearchSource` is the seam between the pipeline and the network; the
//! production implementation goes through the CORS relay with reqwest.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::ArchiveConfig;
use super::error::SearchError;
use super::request::SearchQuery;

/// Something that can answer a search query with the raw response body
#[async_trait]
pub trait SearchSource: Send + Sync + 'static {
    async fn fetch(&self, query: &SearchQuery) -> Result<String, SearchError>;
}

/// Relay-backed archive client
pub struct RelayClient {
    client: Client,
    config: ArchiveConfig,
}

impl RelayClient {
    pub fn new(config: ArchiveConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SearchSource for RelayClient {
    async fn fetch(&self, query: &SearchQuery) -> Result<String, SearchError> {
        let url = query.relay_url(&self.config);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        // Content type is not checked, the relay does not set one reliably
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}
