//! Background prefetch of project details during idle time.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::ProjectCacheEntry;
use crate::catalog::{fetch_readme, fetch_tree};
use crate::context::ServiceContext;
use crate::model::RepositorySummary;

/// Fallback wait before the first prefetch step.
pub const INITIAL_DELAY: Duration = Duration::from_millis(500);
/// Fallback wait between prefetch steps.
pub const STEP_DELAY: Duration = Duration::from_millis(100);

/// Outcome counts of one prefetch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchReport {
    /// Repositories fetched and cached.
    pub fetched: usize,
    /// Repositories already cached when their turn came.
    pub skipped: usize,
    /// Repositories where every fetch failed.
    pub failed: usize,
}

/// Fills the project cache for repositories the catalog pass left out.
pub struct Prefetcher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> Prefetcher<'a> {
    /// Creates a prefetcher over the given context.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Slugs of repositories with no cache entry yet, in catalog order.
    ///
    /// Blank slugs are dropped and the rest trimmed, matching the keys the
    /// catalog loader caches under.
    #[must_use]
    pub fn pending<'r>(&self, repos: &'r [RepositorySummary]) -> Vec<&'r str> {
        repos
            .iter()
            .filter_map(RepositorySummary::key)
            .filter(|slug| !self.ctx.cache.contains(slug))
            .collect()
    }

    /// Fetches readme and tree for each uncached repository, one at a time.
    ///
    /// Returns immediately when nothing is pending. Otherwise the first step
    /// waits for an idle slot, as does every following step. A repository
    /// that entered the cache meanwhile is skipped; failures never stop the
    /// pass.
    pub async fn run(&self, repos: &[RepositorySummary]) -> PrefetchReport {
        let pending = self.pending(repos);
        let mut report = PrefetchReport::default();
        if pending.is_empty() {
            return report;
        }

        debug!(pending = pending.len(), "prefetch scheduled");
        self.ctx.scheduler.idle(INITIAL_DELAY).await;

        for slug in pending {
            if self.ctx.cache.contains(slug) {
                report.skipped += 1;
            } else {
                let fetcher = self.ctx.fetcher.as_ref();
                let (readme, tree) = tokio::join!(fetch_readme(fetcher, slug), fetch_tree(fetcher, slug));
                match (readme, tree) {
                    (Err(readme_err), Err(tree_err)) => {
                        warn!(slug, readme = %readme_err, tree = %tree_err, "prefetch failed");
                        report.failed += 1;
                    }
                    (readme, tree) => {
                        self.ctx.cache.insert(ProjectCacheEntry::loaded(
                            slug,
                            readme.unwrap_or_default(),
                            tree.ok(),
                        ));
                        report.fetched += 1;
                    }
                }
            }
            self.ctx.scheduler.idle(STEP_DELAY).await;
        }

        info!(fetched = report.fetched, skipped = report.skipped, failed = report.failed, "prefetch finished");
        report
    }
}
