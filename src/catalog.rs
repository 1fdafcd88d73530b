//! Project catalog loading and incremental card rendering.

use tracing::{debug, error, info, warn};

use crate::cache::ProjectCacheEntry;
use crate::context::ServiceContext;
use crate::error::{FetchError, LoadError};
use crate::info::{extract, ProjectDisplayInfo};
use crate::model::{Catalog, FileTreeNode, RepoFiles, RepoMeta, RepoResource, RepositorySummary, CATALOG_PATH};
use crate::page::escape;
use crate::ports::fetcher::{fetch_json, Fetcher};

/// Result of a successful catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCatalog {
    /// Every repository in the catalog, including skipped ones.
    pub repos: Vec<RepositorySummary>,
    /// Cards rendered, in catalog order.
    pub cards: Vec<ProjectDisplayInfo>,
}

/// Fetches a repository's README fragment.
///
/// # Errors
///
/// Returns the fetch error.
pub async fn fetch_readme(fetcher: &dyn Fetcher, slug: &str) -> Result<String, FetchError> {
    fetcher.fetch_text(&RepoResource::Readme.path(slug)).await
}

/// Fetches and parses a repository's `meta.json`.
///
/// # Errors
///
/// Returns the fetch or parse error.
pub async fn fetch_meta(fetcher: &dyn Fetcher, slug: &str) -> Result<RepoMeta, FetchError> {
    fetch_json(fetcher, &RepoResource::Meta.path(slug)).await
}

/// Fetches and parses a repository's `tree.json`.
///
/// # Errors
///
/// Returns the fetch or parse error.
pub async fn fetch_tree(fetcher: &dyn Fetcher, slug: &str) -> Result<FileTreeNode, FetchError> {
    fetch_json(fetcher, &RepoResource::Tree.path(slug)).await
}

/// Keeps the value, or logs the miss and substitutes nothing.
fn tolerate<T>(slug: &str, what: &str, result: Result<T, FetchError>) -> Option<T> {
    result.map_err(|err| debug!(slug, resource = what, error = %err, "resource unavailable")).ok()
}

/// Renders one project card.
#[must_use]
pub fn render_card(info: &ProjectDisplayInfo) -> String {
    let tags: String = info
        .tags
        .iter()
        .map(|tag| format!("<span class=\"project-tag\">{}</span>", escape(tag)))
        .collect();
    format!(
        "<div class=\"project-card\" data-slug=\"{slug}\">\
         <div class=\"project-visual\" style=\"background: {visual}\"></div>\
         <div class=\"project-content\">\
         <h3 class=\"project-title\">{title}</h3>\
         <p class=\"project-description\">{description}</p>\
         <div class=\"project-tags\">{tags}</div>\
         <a class=\"project-link\" href=\"{link}\" target=\"_blank\">GitHub</a>\
         </div></div>",
        slug = escape(&info.folder_name),
        visual = info.visual,
        title = escape(&info.title),
        description = escape(&info.description),
        link = escape(&info.github_link),
    )
}

/// Renders the panel shown when the catalog itself is unavailable.
#[must_use]
pub fn render_catalog_error(err: &LoadError) -> String {
    format!(
        "<div class=\"projects-error\"><p>Unable to load projects.</p><pre>{}</pre></div>",
        escape(&err.to_string())
    )
}

/// Loads the catalog and renders one card per repository.
pub struct CatalogLoader<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CatalogLoader<'a> {
    /// Creates a loader over the given context.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolves the catalog and renders cards into the projects section.
    ///
    /// Cards appear in catalog order, one at a time, with a scheduler yield
    /// after each. A repository that fails is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Catalog`] when the catalog cannot be obtained; the
    /// projects section then shows an error panel with the error text.
    pub async fn load(&self) -> Result<LoadedCatalog, LoadError> {
        let catalog = match self.resolve_catalog().await {
            Ok(catalog) => catalog,
            Err(err) => {
                error!(error = %err, "catalog unavailable");
                self.ctx.page.projects.set(render_catalog_error(&err));
                return Err(err);
            }
        };

        self.ctx.page.projects.clear();
        let mut cards = Vec::with_capacity(catalog.repos.len());
        for repo in &catalog.repos {
            match self.load_repository(repo).await {
                Ok(card) => cards.push(card),
                Err(err) => warn!(error = %err, "skipping repository"),
            }
            self.ctx.scheduler.yield_now().await;
        }

        info!(repos = catalog.repos.len(), cards = cards.len(), "project catalog rendered");
        Ok(LoadedCatalog { repos: catalog.repos, cards })
    }

    /// The catalog from the bundle, else from the site.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Catalog`] if fetching or parsing fails.
    pub async fn resolve_catalog(&self) -> Result<Catalog, LoadError> {
        if let Some(catalog) = self.ctx.bundle.as_ref().and_then(|b| b.projects.clone()) {
            return Ok(catalog);
        }
        fetch_json(self.ctx.fetcher.as_ref(), CATALOG_PATH).await.map_err(LoadError::Catalog)
    }

    async fn load_repository(&self, repo: &RepositorySummary) -> Result<ProjectDisplayInfo, LoadError> {
        let Some(slug) = repo.key() else {
            return Err(LoadError::Repository { slug: repo.slug.clone(), reason: "empty slug".into() });
        };

        let files = match self.ctx.bundle.as_ref().and_then(|b| b.repo_files(slug)) {
            Some(files) => files.clone(),
            None => self.fetch_files(slug).await,
        };

        self.ctx.cache.insert(ProjectCacheEntry::loaded(
            slug,
            files.readme.clone().unwrap_or_default(),
            files.tree.clone(),
        ));

        let meta = files.meta.clone().or_else(|| {
            (repo.owner.is_some() && repo.repo.is_some()).then(|| RepoMeta {
                owner: repo.owner.clone(),
                repo: repo.repo.clone(),
                ..RepoMeta::default()
            })
        });
        let card = extract(
            slug,
            files.readme.as_deref().unwrap_or_default(),
            meta.as_ref(),
            files.tree.as_ref(),
            &self.ctx.title_prefix,
        );
        self.ctx.page.projects.append(render_card(&card));
        debug!(slug, "card rendered");
        Ok(card)
    }

    /// The three per-repository files, fetched concurrently; each may be absent.
    async fn fetch_files(&self, slug: &str) -> RepoFiles {
        let fetcher = self.ctx.fetcher.as_ref();
        let (readme, meta, tree) =
            tokio::join!(fetch_readme(fetcher, slug), fetch_meta(fetcher, slug), fetch_tree(fetcher, slug));
        RepoFiles {
            readme: tolerate(slug, "readme", readme),
            meta: tolerate(slug, "meta", meta),
            tree: tolerate(slug, "tree", tree),
        }
    }
}
