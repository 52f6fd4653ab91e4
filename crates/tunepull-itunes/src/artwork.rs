//! Raw artwork download.

use reqwest::Client;
use tracing::debug;

use crate::error::FetchError;

/// Fetcher for artwork bytes referenced by a candidate.
///
/// Returns the body verbatim; callers decide what to do with the image
/// and whether a failure matters.
#[derive(Debug, Clone, Default)]
pub struct ArtworkFetcher {
    client: Client,
}

impl ArtworkFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(target: "itunes", url = %url, "fetching artwork");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
