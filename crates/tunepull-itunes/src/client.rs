// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{Result, SearchError};
use crate::models::{Candidate, SearchResponse, SearchTerms};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const ITUNES_API_BASE: &str = "https://itunes.apple.com";
const USER_AGENT: &str = concat!("tunepull/", env!("CARGO_PKG_VERSION"));

/// iTunes Search API client.
///
/// Submits a single song search per call; results are capped by the
/// configured limit (20 by default). There is no retry and no timeout
/// beyond the transport's own.
#[derive(Debug, Clone)]
pub struct ItunesClient {
    client: Client,
    base_url: String,
    media: String,
    entity: String,
    result_limit: u32,
}

impl ItunesClient {
    /// Create a new client with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder() -> ItunesClientBuilder {
        ItunesClientBuilder::default()
    }

    /// Search the catalog for songs matching the given terms.
    ///
    /// Fails locally with [`SearchError::EmptyQuery`] when no term field
    /// is non-empty, before any request is made.
    ///
    /// # Example
    /// ```no_run
    /// # use tunepull_itunes::{ItunesClient, SearchTerms};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ItunesClient::new()?;
    /// let terms = SearchTerms::new().title("Karma Police").artist("Radiohead");
    /// let candidates = client.search(&terms).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, terms: &SearchTerms) -> Result<Vec<Candidate>> {
        let term = terms.term();
        if term.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let mut url = Url::parse(&format!("{}/search", self.base_url))
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("term", &term)
            .append_pair("media", &self.media)
            .append_pair("entity", &self.entity)
            .append_pair("limit", &self.result_limit.to_string());

        let response: SearchResponse = self.get(url.as_str()).await?;

        debug!(
            target: "itunes",
            term = %term,
            results = response.results.len(),
            "search completed"
        );

        Ok(response.results)
    }

    /// Internal method to perform GET requests with JSON decoding.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        trace!(target: "itunes", "GET {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        debug!(target: "itunes", "response status: {}", status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        trace!(target: "itunes", "response body: {}", body);

        serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

impl Default for ItunesClient {
    fn default() -> Self {
        // Default should be infallible; fall back to a basic reqwest
        // client if the configured one cannot be built.
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        ItunesClient {
            client,
            base_url: ITUNES_API_BASE.to_string(),
            media: "music".to_string(),
            entity: "song".to_string(),
            result_limit: 20,
        }
    }
}

/// Builder for configuring an iTunes Search API client.
#[derive(Debug)]
pub struct ItunesClientBuilder {
    base_url: String,
    media: String,
    entity: String,
    result_limit: u32,
    timeout: Duration,
}

impl Default for ItunesClientBuilder {
    fn default() -> Self {
        Self {
            base_url: ITUNES_API_BASE.to_string(),
            media: "music".to_string(),
            entity: "song".to_string(),
            result_limit: 20,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ItunesClientBuilder {
    /// Set a custom base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `media` query parameter.
    pub fn media(mut self, media: impl Into<String>) -> Self {
        self.media = media.into();
        self
    }

    /// Set the `entity` query parameter.
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = entity.into();
        self
    }

    /// Set the result-count ceiling submitted with every search.
    pub fn result_limit(mut self, limit: u32) -> Self {
        self.result_limit = limit;
        self
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ItunesClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(ItunesClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            media: self.media,
            entity: self.entity,
            result_limit: self.result_limit,
        })
    }
}
