//! Packs a site's data files into one [`SiteBundle`].

use tracing::{info, warn};

use crate::catalog::{fetch_meta, fetch_readme, fetch_tree};
use crate::error::FetchError;
use crate::model::{Catalog, RepoFiles, RepositorySummary, SiteBundle, CATALOG_PATH, EXPERIENCE_PATH};
use crate::ports::fetcher::{fetch_json, Fetcher};

/// A packed bundle and the problems met while packing.
#[derive(Debug, Default)]
pub struct PackOutcome {
    /// Everything that could be read.
    pub bundle: SiteBundle,
    /// Files that existed but were not valid JSON.
    pub invalid: Vec<String>,
}

/// Keeps parse failures for the report; missing files are simply absent.
fn keep<T>(result: Result<T, FetchError>, invalid: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(FetchError::Parse { path, message }) => {
            warn!(%path, error = %message, "invalid JSON; skipped");
            invalid.push(path);
            None
        }
        Err(_) => None,
    }
}

/// Reads the experience CSV, the catalog and every listed repository's files.
///
/// Repositories with an empty slug are skipped. Every other repository gets
/// an entry in `repo_files`, empty when none of its files could be read, so
/// a page using the bundle never falls back to fetching it.
pub async fn pack(fetcher: &dyn Fetcher) -> PackOutcome {
    let mut outcome = PackOutcome::default();
    let invalid = &mut outcome.invalid;

    outcome.bundle.experience = fetcher.fetch_text(EXPERIENCE_PATH).await.ok();
    outcome.bundle.projects = keep(fetch_json::<Catalog>(fetcher, CATALOG_PATH).await, invalid);

    let slugs: Vec<String> = outcome
        .bundle
        .projects
        .iter()
        .flat_map(|catalog| catalog.repos.iter())
        .filter_map(RepositorySummary::key)
        .map(str::to_string)
        .collect();

    for slug in slugs {
        let (readme, meta, tree) =
            tokio::join!(fetch_readme(fetcher, &slug), fetch_meta(fetcher, &slug), fetch_tree(fetcher, &slug));
        let files = RepoFiles {
            readme: readme.ok().filter(|text| !text.is_empty()),
            meta: keep(meta, invalid),
            tree: keep(tree, invalid),
        };
        info!(slug, empty = files == RepoFiles::default(), "packed repository");
        outcome.bundle.repo_files.insert(slug, files);
    }

    outcome
}
