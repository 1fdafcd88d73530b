//! Fetcher port for reading site resources.

use std::future::Future;
use std::pin::Pin;

use crate::error::FetchError;

/// Boxed future type alias used by [`Fetcher`] to keep the trait dyn-compatible.
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>>;

/// Retrieves site resources by path relative to the site root.
///
/// Every fetch is independent: one failing never affects another in flight.
pub trait Fetcher: Send + Sync {
    /// Fetches the resource at `path` as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is missing or cannot be read.
    fn fetch_text(&self, path: &str) -> FetchFuture<'_>;
}

/// Fetches `path` and parses it as JSON.
///
/// # Errors
///
/// Returns the fetch error, or [`FetchError::Parse`] if the body is not valid JSON
/// for `T`.
pub async fn fetch_json<T>(fetcher: &dyn Fetcher, path: &str) -> Result<T, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    let text = fetcher.fetch_text(path).await?;
    serde_json::from_str(&text)
        .map_err(|e| FetchError::Parse { path: path.to_string(), message: e.to_string() })
}
