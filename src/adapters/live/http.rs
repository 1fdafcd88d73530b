//! Live adapter for the `Fetcher` port over HTTP.

use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::ports::fetcher::{FetchFuture, Fetcher};

/// Live fetcher that resolves paths against a base URL.
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    /// Creates a fetcher rooted at `base`.
    ///
    /// A trailing slash is added when missing so relative paths resolve
    /// beneath the base instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute URL.
    pub fn new(base: &str) -> Result<Self, String> {
        let normalized = if base.ends_with('/') { base.to_string() } else { format!("{base}/") };
        let base =
            Url::parse(&normalized).map_err(|e| format!("Invalid site URL {base:?}: {e}"))?;
        Ok(Self { client: Client::new(), base })
    }

    /// The base URL all paths are resolved against.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, path: &str) -> FetchFuture<'_> {
        let path = path.to_string();

        Box::pin(async move {
            let url = self.base.join(&path).map_err(|e| FetchError::Network {
                path: path.clone(),
                message: format!("invalid resource path: {e}"),
            })?;

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Network { path: path.clone(), message: e.to_string() })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status { path, status: status.as_u16() });
            }

            response
                .text()
                .await
                .map_err(|e| FetchError::Network { path, message: format!("failed to read body: {e}") })
        })
    }
}
