//! JSON collection endpoint source.
//!
//! Talks to any endpoint that understands JSONPlaceholder-style paging
//! (`?_page=N&_limit=M`) and returns a JSON array of `{id, title, body}`
//! records.  The search query is never sent: filtering happens locally over
//! whatever pages have already been loaded.

use async_trait::async_trait;

use super::{PageSource, ResultItem};
use crate::error::FetchError;

/// A paged JSON endpoint.
pub struct HttpSource {
    /// Collection URL without paging parameters.
    pub url: String,
    /// A short label shown in the list title.
    pub label: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a new source.
    ///
    /// # Arguments
    ///
    /// * `url`: the collection URL (e.g.
    ///   `https://jsonplaceholder.typicode.com/posts`).
    /// * `label`: short name displayed in the TUI.
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_client(url, label, reqwest::Client::new())
    }

    /// Like [`HttpSource::new`] but with a caller-configured client.
    pub fn with_client(
        url: impl Into<String>,
        label: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            client,
        }
    }

    /// Decode one page body.
    ///
    /// Pure (no I/O) so that tests can exercise decoding without a server.
    pub fn parse_page(body: &[u8]) -> Result<Vec<ResultItem>, FetchError> {
        Ok(serde_json::from_slice(body)?)
    }
}

#[async_trait]
impl PageSource for HttpSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<ResultItem>, FetchError> {
        let body = self
            .client
            .get(&self.url)
            .query(&[("_page", page), ("_limit", limit)])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Self::parse_page(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
