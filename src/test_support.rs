//! In-memory fetcher shared by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::adapters::live::IdleScheduler;
use crate::context::ServiceContext;
use crate::error::FetchError;
use crate::model::SiteBundle;
use crate::ports::{FetchFuture, Fetcher};

/// In-memory site; every path not listed is a 404. Records requested paths.
#[derive(Default)]
pub(crate) struct MemSite {
    files: HashMap<String, String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MemSite {
    pub(crate) fn with(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.to_string());
        self
    }

    /// Handle on the request log that outlives the fetcher being boxed.
    pub(crate) fn requests(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }
}

impl Fetcher for MemSite {
    fn fetch_text(&self, path: &str) -> FetchFuture<'_> {
        self.requests.lock().unwrap().push(path.to_string());
        let result = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::Status { path: path.to_string(), status: 404 });
        Box::pin(async move { result })
    }
}

/// Context over `site` with the idle scheduler and the `org__` title prefix.
pub(crate) fn context(site: MemSite, bundle: Option<SiteBundle>) -> ServiceContext {
    ServiceContext::new(Box::new(site), Box::new(IdleScheduler), bundle, "org__")
}
