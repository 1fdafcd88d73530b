//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first (via `dotenvy`), so
//! every variable can also be set there.

use std::path::PathBuf;

/// Organisational prefix stripped from slugs to form card titles.
pub const DEFAULT_TITLE_PREFIX: &str = "gkwang4912__";

/// Where site resources are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSource {
    /// An `http://` or `https://` base URL.
    Url(String),
    /// A local directory laid out like the deployed site.
    Directory(PathBuf),
}

impl SiteSource {
    /// Classifies `value` as a URL or a directory path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::Directory(PathBuf::from(value))
        }
    }

    /// Display form used in logs and cassettes.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Directory(dir) => dir.display().to_string(),
        }
    }
}

/// Which scheduling strategy drives deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerKind {
    /// Yield to the runtime and run deferred work as soon as it is free.
    #[default]
    Idle,
    /// Wait fixed delays between deferred steps.
    Timer,
}

impl SchedulerKind {
    /// Parses `idle` or `timer` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error for any other value.
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "timer" => Ok(Self::Timer),
            other => Err(format!("Unknown scheduler {other:?}; expected \"idle\" or \"timer\"")),
        }
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolioConfig {
    /// Site root to fetch from (`FOLIO_SOURCE`, default `.`).
    pub source: SiteSource,
    /// Scheduling strategy (`FOLIO_SCHEDULER`, default `idle`).
    pub scheduler: SchedulerKind,
    /// Slug prefix stripped from titles (`FOLIO_PREFIX`).
    pub title_prefix: String,
    /// Directory to record fetch cassettes into (`FOLIO_RECORD`).
    pub record_dir: Option<PathBuf>,
    /// Cassette to replay instead of fetching (`FOLIO_REPLAY`).
    pub replay: Option<PathBuf>,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            source: SiteSource::Directory(PathBuf::from(".")),
            scheduler: SchedulerKind::Idle,
            title_prefix: DEFAULT_TITLE_PREFIX.to_string(),
            record_dir: None,
            replay: None,
        }
    }
}

impl FolioConfig {
    /// Loads `.env` (if present) and reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is the common case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(source) = lookup("FOLIO_SOURCE").filter(|s| !s.is_empty()) {
            config.source = SiteSource::parse(&source);
        }
        if let Some(kind) = lookup("FOLIO_SCHEDULER") {
            config.scheduler = SchedulerKind::parse(&kind)?;
        }
        if let Some(prefix) = lookup("FOLIO_PREFIX") {
            config.title_prefix = prefix;
        }
        config.record_dir = lookup("FOLIO_RECORD").filter(|s| !s.is_empty()).map(PathBuf::from);
        config.replay = lookup("FOLIO_REPLAY").filter(|s| !s.is_empty()).map(PathBuf::from);
        Ok(config)
    }
}
