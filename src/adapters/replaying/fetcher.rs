//! Replaying adapter for the `Fetcher` port.

use std::sync::Mutex;

use serde_json::json;

use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::FetchError;
use crate::ports::fetcher::{FetchFuture, Fetcher};

/// Serves recorded fetches from a cassette.
///
/// Requests that were never recorded fail like a missing resource.
pub struct ReplayingFetcher {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFetcher {
    /// Creates a replaying fetcher for the given cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self { replayer: Mutex::new(CassetteReplayer::new(cassette)) }
    }
}

/// Converts a recorded `{"Ok": ..}` / `{"Err": ..}` output back into a result.
fn replay_result(path: &str, output: Option<serde_json::Value>) -> Result<String, FetchError> {
    let Some(output) = output else {
        return Err(FetchError::Replayed(format!("{path}: not recorded in cassette")));
    };
    if let Some(err) = output.get("Err") {
        return Err(FetchError::Replayed(err.as_str().unwrap_or("unknown error").to_string()));
    }
    match output.get("Ok").and_then(serde_json::Value::as_str) {
        Some(text) => Ok(text.to_string()),
        None => Err(FetchError::Replayed(format!("{path}: malformed cassette output"))),
    }
}

impl Fetcher for ReplayingFetcher {
    fn fetch_text(&self, path: &str) -> FetchFuture<'_> {
        let output = match self.replayer.lock() {
            Ok(mut replayer) => replayer
                .next_interaction("fetch", "fetch_text", &json!({ "path": path }))
                .map(|interaction| interaction.output.clone()),
            Err(_) => None,
        };
        let result = replay_result(path, output);
        Box::pin(async move { result })
    }
}
