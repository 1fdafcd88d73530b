//! Site data shapes: catalog, per-repository files, and the packed bundle.

pub mod tree;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use tree::FileTreeNode;

/// Path of the catalog document relative to the site root.
pub const CATALOG_PATH: &str = "repo-cache/project.json";
/// Path of the experience CSV relative to the site root.
pub const EXPERIENCE_PATH: &str = "experience.csv";

/// Per-repository resource kinds stored under `repo-cache/<slug>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoResource {
    /// Pre-rendered README HTML fragment.
    Readme,
    /// `meta.json` with owner and repository name.
    Meta,
    /// `tree.json` file tree.
    Tree,
}

impl RepoResource {
    /// Site-relative path of this resource for `slug`.
    #[must_use]
    pub fn path(self, slug: &str) -> String {
        let file = match self {
            Self::Readme => "readme.html",
            Self::Meta => "meta.json",
            Self::Tree => "tree.json",
        };
        format!("repo-cache/{slug}/{file}")
    }
}

/// One repository listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Unique identifier, also the cache directory name.
    pub slug: String,
    /// GitHub owner, when the catalog carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// GitHub repository name, when the catalog carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

impl RepositorySummary {
    /// Summary carrying only a slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into(), owner: None, repo: None }
    }

    /// The slug with surrounding whitespace removed, or `None` when that
    /// leaves nothing. Every cache key and resource path uses this form.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        Some(self.slug.trim()).filter(|slug| !slug.is_empty())
    }
}

/// The list of repositories to display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Repositories in display order.
    #[serde(default)]
    pub repos: Vec<RepositorySummary>,
}

/// Contents of a repository's `meta.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMeta {
    /// GitHub owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// GitHub repository name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// When the cache entry was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Commit the cache entry was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

/// Pre-packed files of one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFiles {
    /// README HTML fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    /// Parsed `meta.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RepoMeta>,
    /// Parsed `tree.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<FileTreeNode>,
}

/// All site data packed into one document so no per-file fetches are needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteBundle {
    /// Raw experience CSV text.
    #[serde(default)]
    pub experience: Option<String>,
    /// The repository catalog.
    #[serde(default)]
    pub projects: Option<Catalog>,
    /// Per-repository files keyed by slug.
    #[serde(default)]
    pub repo_files: BTreeMap<String, RepoFiles>,
}

impl SiteBundle {
    /// Parses a bundle from JSON text.
    ///
    /// A leading `window.SITE_DATA = ` assignment and trailing `;` are
    /// accepted, so the browser-side `data.js` loads as well.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the text is not a valid bundle.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let trimmed = text.trim();
        let body = trimmed
            .strip_prefix("window.SITE_DATA")
            .and_then(|rest| rest.trim_start().strip_prefix('='))
            .map_or(trimmed, |rest| rest.trim().trim_end_matches(';'));
        serde_json::from_str(body)
    }

    /// Files packed for `slug`, if any.
    #[must_use]
    pub fn repo_files(&self, slug: &str) -> Option<&RepoFiles> {
        self.repo_files.get(slug)
    }
}
