//! Recording adapter for the `Fetcher` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::fetcher::{FetchFuture, Fetcher};

/// Records fetches while delegating to an inner implementation.
pub struct RecordingFetcher {
    inner: Box<dyn Fetcher>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFetcher {
    /// Creates a new recording fetcher wrapping the given implementation.
    pub fn new(inner: Box<dyn Fetcher>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a str,
}

impl Fetcher for RecordingFetcher {
    fn fetch_text(&self, path: &str) -> FetchFuture<'_> {
        let path = path.to_string();

        Box::pin(async move {
            let result = self.inner.fetch_text(&path).await;
            record_result(&self.recorder, "fetch", "fetch_text", &PathInput { path: &path }, &result);
            result
        })
    }
}
