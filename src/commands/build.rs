//! `folio build` command.

use tracing::info;

use crate::catalog::CatalogLoader;
use crate::context::ServiceContext;
use crate::experience::ExperienceLoader;
use crate::prefetch::Prefetcher;

/// Execute the `build` command.
///
/// Loads the experience list and the project cards, lets the prefetcher
/// fill the cache, then prints the rendered page. A missing catalog still
/// prints the page, with the error panel in the projects section.
///
/// # Errors
///
/// Never fails once the context exists; load failures are rendered instead.
pub async fn run(ctx: &ServiceContext) -> Result<(), String> {
    ExperienceLoader::new(ctx.fetcher.as_ref(), ctx.bundle.as_ref())
        .load(&ctx.page.experience)
        .await;

    if let Ok(loaded) = CatalogLoader::new(ctx).load().await {
        let report = Prefetcher::new(ctx).run(&loaded.repos).await;
        info!(cached = ctx.cache.len(), failed = report.failed, "project details cached");
    }

    print!("{}", ctx.page.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CATALOG_PATH;
    use crate::test_support::{context, MemSite};

    #[tokio::test]
    async fn build_caches_every_repository() {
        let site = MemSite::default()
            .with("experience.csv", "type,year,title,venue,link\nAward,2023,Best Paper,ACL,https://x\n")
            .with(CATALOG_PATH, r#"{"repos":[{"slug":"org__a"},{"slug":"org__b"}]}"#)
            .with("repo-cache/org__a/readme.html", "<p>Project A readme text.</p>");
        let ctx = context(site, None);

        run(&ctx).await.unwrap();

        assert_eq!(ctx.page.experience.len(), 1);
        assert_eq!(ctx.page.projects.len(), 2);
        assert_eq!(ctx.cache.len(), 2);
    }
}
