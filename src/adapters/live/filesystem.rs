//! Live adapter for the `Fetcher` port backed by a local site directory.

use std::path::{Path, PathBuf};

use crate::error::FetchError;
use crate::ports::fetcher::{FetchFuture, Fetcher};

/// Serves site resources from files under a root directory.
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    /// Creates a fetcher rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The site root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetcher for DirectoryFetcher {
    fn fetch_text(&self, path: &str) -> FetchFuture<'_> {
        let relative = path.trim_start_matches('/').to_string();
        let full = self.root.join(&relative);

        Box::pin(async move {
            std::fs::read_to_string(&full).map_err(|source| FetchError::Io { path: relative, source })
        })
    }
}
