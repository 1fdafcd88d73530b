//! Service context bundling the ports, the project cache and the page.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::{DirectoryFetcher, HttpFetcher, IdleScheduler, TimerScheduler};
use crate::adapters::recording::RecordingFetcher;
use crate::adapters::replaying::ReplayingFetcher;
use crate::cache::ProjectCache;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::{FolioConfig, SchedulerKind, SiteSource};
use crate::model::SiteBundle;
use crate::page::Page;
use crate::ports::{Fetcher, Scheduler};

/// Everything one page session needs.
///
/// The loaders, the prefetcher and the modal all borrow the same context, so
/// they share one cache and render into one page.
pub struct ServiceContext {
    /// Fetcher for site resources.
    pub fetcher: Box<dyn Fetcher>,
    /// Scheduler for yields and idle work.
    pub scheduler: Box<dyn Scheduler>,
    /// Pre-packed site data, consulted before any fetch.
    pub bundle: Option<SiteBundle>,
    /// Project detail cache for this session.
    pub cache: ProjectCache,
    /// Rendered page sections.
    pub page: Page,
    /// Slug prefix stripped from card titles.
    pub title_prefix: String,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from explicit parts with an empty cache and page.
    #[must_use]
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        scheduler: Box<dyn Scheduler>,
        bundle: Option<SiteBundle>,
        title_prefix: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            scheduler,
            bundle,
            cache: ProjectCache::new(),
            page: Page::new(),
            title_prefix: title_prefix.into(),
            recorder: None,
        }
    }

    /// Wires adapters according to `config`.
    ///
    /// `FOLIO_REPLAY` takes precedence over live fetching. When `FOLIO_RECORD`
    /// is set, live fetches are also recorded to a new cassette in that
    /// directory, written when the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the replay cassette cannot be loaded or the site
    /// URL is invalid.
    pub fn from_config(config: &FolioConfig, bundle: Option<SiteBundle>) -> Result<Self, String> {
        let scheduler: Box<dyn Scheduler> = match config.scheduler {
            SchedulerKind::Idle => Box::new(IdleScheduler),
            SchedulerKind::Timer => Box::new(TimerScheduler),
        };

        if let Some(path) = &config.replay {
            let cassette = Cassette::load(path)?;
            info!(cassette = %path.display(), "replaying fetches");
            let fetcher = Box::new(ReplayingFetcher::new(&cassette));
            return Ok(Self::new(fetcher, scheduler, bundle, config.title_prefix.clone()));
        }

        let live: Box<dyn Fetcher> = match &config.source {
            SiteSource::Url(url) => Box::new(HttpFetcher::new(url)?),
            SiteSource::Directory(dir) => Box::new(DirectoryFetcher::new(dir)),
        };

        let Some(dir) = &config.record_dir else {
            return Ok(Self::new(live, scheduler, bundle, config.title_prefix.clone()));
        };

        let path = dir.join(format!("fetch-{}.cassette.yaml", uuid::Uuid::new_v4()));
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(&path, "folio-session", config.source.describe())));
        info!(cassette = %path.display(), "recording fetches");
        let fetcher = Box::new(RecordingFetcher::new(live, Arc::clone(&recorder)));
        let mut ctx = Self::new(fetcher, scheduler, bundle, config.title_prefix.clone());
        ctx.recorder = Some(recorder);
        Ok(ctx)
    }

    /// Where the recorded cassette will be written, if recording.
    #[must_use]
    pub fn recording_path(&self) -> Option<std::path::PathBuf> {
        let recorder = self.recorder.as_ref()?;
        let guard = recorder.lock().ok()?;
        Some(guard.path().to_path_buf())
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        let Ok(guard) = recorder.lock() else {
            warn!("cassette recorder lock poisoned; recording lost");
            return;
        };
        match guard.write() {
            Ok(path) => info!(cassette = %path.display(), "recording saved"),
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
    }
}

/// Reads a bundle file, accepting either plain JSON or the `data.js` form.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_bundle(path: &Path) -> Result<SiteBundle, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read bundle {}: {e}", path.display()))?;
    SiteBundle::from_json(&text).map_err(|e| format!("Failed to parse bundle {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn replay_config_serves_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.cassette.yaml");
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            source: "https://example.com/".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "fetch".into(),
                method: "fetch_text".into(),
                input: json!({"path": "experience.csv"}),
                output: json!({"Ok": "type,year\n"}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let config = FolioConfig { replay: Some(path), ..FolioConfig::default() };
        let ctx = ServiceContext::from_config(&config, None).unwrap();
        assert_eq!(ctx.fetcher.fetch_text("experience.csv").await.unwrap(), "type,year\n");
    }

    #[tokio::test]
    async fn record_config_writes_cassette_on_drop() {
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("experience.csv"), "type,year\n").unwrap();
        let cassettes = tempfile::tempdir().unwrap();

        let config = FolioConfig {
            source: SiteSource::Directory(site.path().to_path_buf()),
            record_dir: Some(cassettes.path().to_path_buf()),
            ..FolioConfig::default()
        };
        let ctx = ServiceContext::from_config(&config, None).unwrap();
        ctx.fetcher.fetch_text("experience.csv").await.unwrap();
        let path = ctx.recording_path().unwrap();
        drop(ctx);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].input, json!({"path": "experience.csv"}));
    }

    #[test]
    fn bundle_file_errors_name_the_path() {
        let err = load_bundle(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(err.contains("/nonexistent/data.json"));
    }
}
