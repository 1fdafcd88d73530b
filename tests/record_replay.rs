//! Record-replay round-trip integration test.
//!
//! Records a page session against a directory site, then replays the
//! cassette with the site gone and checks the rendered page is identical.

use std::path::Path;

use folio::catalog::CatalogLoader;
use folio::config::{FolioConfig, SiteSource};
use folio::context::ServiceContext;
use folio::experience::ExperienceLoader;
use folio::prefetch::Prefetcher;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

async fn render_session(ctx: &ServiceContext) -> (String, usize) {
    ExperienceLoader::new(ctx.fetcher.as_ref(), ctx.bundle.as_ref())
        .load(&ctx.page.experience)
        .await;
    let loaded = CatalogLoader::new(ctx).load().await.unwrap();
    Prefetcher::new(ctx).run(&loaded.repos).await;
    (ctx.page.render(), ctx.cache.len())
}

#[tokio::test]
async fn record_then_replay_produces_identical_page() {
    let site = tempfile::tempdir().unwrap();
    write(site.path(), "experience.csv", "type,year,title,venue,link\nTalk,2022,Intro,PyCon,#\n");
    write(site.path(), "repo-cache/project.json", r#"{"repos":[{"slug":"x__one"},{"slug":"x__two"}]}"#);
    write(site.path(), "repo-cache/x__one/readme.html", "<p>First project.</p>");
    write(site.path(), "repo-cache/x__two/meta.json", r#"{"owner":"x","repo":"two"}"#);
    let cassettes = tempfile::tempdir().unwrap();

    let record = FolioConfig {
        source: SiteSource::Directory(site.path().to_path_buf()),
        record_dir: Some(cassettes.path().to_path_buf()),
        title_prefix: "x__".into(),
        ..FolioConfig::default()
    };
    let ctx = ServiceContext::from_config(&record, None).unwrap();
    let recorded = render_session(&ctx).await;
    let cassette = ctx.recording_path().unwrap();
    drop(ctx);
    drop(site);

    let replay = FolioConfig { replay: Some(cassette), title_prefix: "x__".into(), ..FolioConfig::default() };
    let first = render_session(&ServiceContext::from_config(&replay, None).unwrap()).await;
    let second = render_session(&ServiceContext::from_config(&replay, None).unwrap()).await;

    assert_eq!(first, recorded);
    assert_eq!(second, recorded);
    assert!(recorded.0.contains("First project."));
    assert_eq!(recorded.1, 2);
}
