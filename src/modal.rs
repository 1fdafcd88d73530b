//! Project detail modal.
//!
//! Two states, `Closed` and `Open(slug)`. Opening fills the readme and tree
//! panes from the first source that has the project: the cache, then the
//! bundle, then the network. Closing deactivates at once and hides the
//! overlay after [`TRANSITION_DELAY`], unless the modal was reopened in the
//! meantime.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::{fetch_readme, fetch_tree};
use crate::context::ServiceContext;
use crate::info::title_for;
use crate::model::FileTreeNode;
use crate::page::escape;

/// Delay between deactivating the modal and hiding the overlay.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(300);

const LOADING: &str = "<p class=\"loading\">Loading...</p>";
const NO_README: &str = "<p class=\"empty\">No README available.</p>";
const NO_TREE: &str = "<p class=\"empty\">No file tree available.</p>";

/// Whether the modal is showing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    /// Nothing shown.
    Closed,
    /// Showing the project with this slug.
    Open(String),
}

/// Where the content of an opened modal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// A loaded project cache entry.
    Cache,
    /// The pre-packed bundle.
    Bundle,
    /// Individual fetches.
    Network,
}

/// Visible state of the overlay and its panes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalView {
    /// Overlay is displayed at all.
    pub overlay_visible: bool,
    /// Overlay has its active (opened) styling.
    pub active: bool,
    /// Background scrolling is disabled.
    pub scroll_locked: bool,
    /// How many times background scrolling was restored.
    pub scroll_restores: usize,
    /// Heading text.
    pub title: String,
    /// README pane HTML.
    pub readme: String,
    /// File tree pane HTML.
    pub tree: String,
}

#[derive(Debug)]
struct Inner {
    state: ModalState,
    /// Bumped on every open and close; stale work compares against it.
    generation: u64,
    view: ModalView,
}

#[derive(Debug, Clone, Copy)]
enum Pane {
    Readme,
    Tree,
}

/// The modal controller for one page session.
pub struct Modal<'a> {
    ctx: &'a ServiceContext,
    inner: Mutex<Inner>,
}

impl<'a> Modal<'a> {
    /// Creates a closed modal over the given context.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            inner: Mutex::new(Inner { state: ModalState::Closed, generation: 0, view: ModalView::default() }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ModalState {
        self.lock().state.clone()
    }

    /// Snapshot of the visible state.
    #[must_use]
    pub fn view(&self) -> ModalView {
        self.lock().view.clone()
    }

    /// Opens the modal for `slug` and fills both panes.
    ///
    /// Panes show a loading placeholder until their content resolves. On the
    /// network path each pane resolves on its own, and a failure only puts an
    /// error message in that pane.
    pub async fn open(&self, slug: &str) -> ContentSource {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = ModalState::Open(slug.to_string());
            let view = &mut inner.view;
            view.title = title_for(slug, &self.ctx.title_prefix);
            view.readme = LOADING.to_string();
            view.tree = LOADING.to_string();
            view.overlay_visible = true;
            view.active = true;
            view.scroll_locked = true;
            inner.generation
        };

        if let Some(entry) = self.ctx.cache.get_loaded(slug) {
            debug!(slug, "modal served from cache");
            self.set_pane(generation, Pane::Readme, readme_html(&entry.readme));
            self.set_pane(generation, Pane::Tree, tree_html(entry.tree.as_ref()));
            return ContentSource::Cache;
        }

        if let Some(files) = self.ctx.bundle.as_ref().and_then(|b| b.repo_files(slug)) {
            debug!(slug, "modal served from bundle");
            self.set_pane(generation, Pane::Readme, readme_html(files.readme.as_deref().unwrap_or_default()));
            self.set_pane(generation, Pane::Tree, tree_html(files.tree.as_ref()));
            return ContentSource::Bundle;
        }

        debug!(slug, "modal fetching from network");
        tokio::join!(self.load_readme(generation, slug), self.load_tree(generation, slug));
        // Served from the cache only once both panes have settled.
        self.ctx.cache.mark_loaded(slug);
        ContentSource::Network
    }

    async fn load_readme(&self, generation: u64, slug: &str) {
        match fetch_readme(self.ctx.fetcher.as_ref(), slug).await {
            Ok(readme) => {
                self.set_pane(generation, Pane::Readme, readme_html(&readme));
                self.ctx.cache.backfill(slug, |entry| entry.readme = readme);
            }
            Err(err) => {
                warn!(slug, error = %err, "readme unavailable");
                self.set_pane(generation, Pane::Readme, error_html("README", &err.to_string()));
            }
        }
    }

    async fn load_tree(&self, generation: u64, slug: &str) {
        match fetch_tree(self.ctx.fetcher.as_ref(), slug).await {
            Ok(tree) => {
                self.set_pane(generation, Pane::Tree, tree_html(Some(&tree)));
                self.ctx.cache.backfill(slug, |entry| entry.tree = Some(tree));
            }
            Err(err) => {
                warn!(slug, error = %err, "file tree unavailable");
                self.set_pane(generation, Pane::Tree, error_html("file tree", &err.to_string()));
            }
        }
    }

    /// Writes a pane unless the modal has since been closed or reopened.
    fn set_pane(&self, generation: u64, pane: Pane, html: String) {
        let mut inner = self.lock();
        if inner.generation != generation {
            return;
        }
        match pane {
            Pane::Readme => inner.view.readme = html,
            Pane::Tree => inner.view.tree = html,
        }
    }

    /// Closes the modal.
    ///
    /// Does nothing when already closed. Otherwise the active styling goes
    /// at once and, after [`TRANSITION_DELAY`], the overlay is hidden and
    /// background scrolling restored, provided no open happened in between.
    /// Returns whether this call hid the overlay.
    pub async fn close(&self) -> bool {
        let generation = {
            let mut inner = self.lock();
            if inner.state == ModalState::Closed {
                return false;
            }
            inner.state = ModalState::Closed;
            inner.generation += 1;
            inner.view.active = false;
            inner.generation
        };

        self.ctx.scheduler.sleep(TRANSITION_DELAY).await;

        let mut inner = self.lock();
        if inner.state != ModalState::Closed || inner.generation != generation {
            return false;
        }
        inner.view.overlay_visible = false;
        if inner.view.scroll_locked {
            inner.view.scroll_locked = false;
            inner.view.scroll_restores += 1;
        }
        true
    }

    /// Keyboard handler: `Escape` closes.
    pub async fn handle_key(&self, key: &str) -> bool {
        if key == "Escape" {
            self.close().await
        } else {
            false
        }
    }

    /// A click on the dimmed area around the modal closes it.
    pub async fn click_backdrop(&self) -> bool {
        self.close().await
    }
}

fn readme_html(readme: &str) -> String {
    if readme.trim().is_empty() {
        NO_README.to_string()
    } else {
        readme.to_string()
    }
}

fn tree_html(tree: Option<&FileTreeNode>) -> String {
    let rendered = tree.map(render_tree).unwrap_or_default();
    if rendered.is_empty() {
        NO_TREE.to_string()
    } else {
        format!("<ul class=\"file-tree\">{rendered}</ul>")
    }
}

fn error_html(what: &str, message: &str) -> String {
    format!("<p class=\"error\">Failed to load {what}: {}</p>", escape(message))
}

/// Renders a file tree as nested list items.
///
/// A named directory shows its name and, when it has children, a nested
/// list. The nameless root contributes only its children, so an empty root
/// renders as nothing.
#[must_use]
pub fn render_tree(node: &FileTreeNode) -> String {
    match node {
        FileTreeNode::File { name } => {
            let class = match name.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                    format!("file ext-{}", escape(&ext.to_ascii_lowercase()))
                }
                _ => "file".to_string(),
            };
            format!("<li class=\"{class}\">{}</li>", escape(name))
        }
        FileTreeNode::Dir { name, children } => {
            let inner: String = children.iter().map(render_tree).collect();
            if name.is_empty() {
                return inner;
            }
            let nested = if children.is_empty() { String::new() } else { format!("<ul>{inner}</ul>") };
            format!("<li class=\"dir\"><span class=\"dir-name\">{}</span>{nested}</li>", escape(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::IdleScheduler;
    use crate::cache::ProjectCacheEntry;
    use crate::model::{RepoFiles, SiteBundle};
    use crate::ports::{FetchFuture, Fetcher};
    use crate::test_support::{context, MemSite};

    fn file(name: &str) -> FileTreeNode {
        FileTreeNode::File { name: name.into() }
    }

    #[test]
    fn empty_root_renders_nothing() {
        let root = FileTreeNode::Dir { name: String::new(), children: vec![] };
        assert_eq!(render_tree(&root), "");
        assert_eq!(tree_html(Some(&root)), NO_TREE);
    }

    #[test]
    fn nested_tree_markup() {
        let root = FileTreeNode::Dir {
            name: String::new(),
            children: vec![
                FileTreeNode::Dir { name: "src".into(), children: vec![file("main.PY")] },
                FileTreeNode::Dir { name: "empty".into(), children: vec![] },
                file("Makefile"),
            ],
        };
        assert_eq!(
            render_tree(&root),
            "<li class=\"dir\"><span class=\"dir-name\">src</span><ul><li class=\"file ext-py\">main.PY</li></ul></li>\
             <li class=\"dir\"><span class=\"dir-name\">empty</span></li>\
             <li class=\"file\">Makefile</li>"
        );
    }

    #[test]
    fn dotfile_has_no_extension_class() {
        assert_eq!(render_tree(&file(".gitignore")), "<li class=\"file\">.gitignore</li>");
    }

    #[tokio::test]
    async fn cached_project_issues_no_fetch() {
        let site = MemSite::default();
        let requests = site.requests();
        let ctx = context(site, None);
        ctx.cache.insert(ProjectCacheEntry::loaded("org__a", "<p>cached</p>".into(), Some(file("a.rs"))));

        let modal = Modal::new(&ctx);
        assert_eq!(modal.open("org__a").await, ContentSource::Cache);

        let view = modal.view();
        assert_eq!(view.title, "a");
        assert_eq!(view.readme, "<p>cached</p>");
        assert!(view.tree.contains("a.rs"));
        assert!(view.overlay_visible && view.active && view.scroll_locked);
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bundle_is_second_tier() {
        let mut bundle = SiteBundle::default();
        bundle.repo_files.insert(
            "org__b".into(),
            RepoFiles { readme: Some("<p>packed</p>".into()), meta: None, tree: None },
        );
        let site = MemSite::default();
        let requests = site.requests();
        let ctx = context(site, Some(bundle));

        let modal = Modal::new(&ctx);
        assert_eq!(modal.open("org__b").await, ContentSource::Bundle);
        assert_eq!(modal.view().readme, "<p>packed</p>");
        assert_eq!(modal.view().tree, NO_TREE);
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn network_panes_fail_independently_and_backfill() {
        let site = MemSite::default().with("repo-cache/org__c/readme.html", "<p>from network</p>");
        let ctx = context(site, None);

        let modal = Modal::new(&ctx);
        assert_eq!(modal.open("org__c").await, ContentSource::Network);

        let view = modal.view();
        assert_eq!(view.readme, "<p>from network</p>");
        assert!(view.tree.starts_with("<p class=\"error\">Failed to load file tree:"));
        let cached = ctx.cache.get_loaded("org__c").unwrap();
        assert_eq!(cached.readme, "<p>from network</p>");
        assert!(cached.tree.is_none());
    }

    /// Delays tree fetches by one second.
    struct SlowTree(MemSite);

    impl Fetcher for SlowTree {
        fn fetch_text(&self, path: &str) -> FetchFuture<'_> {
            let slow = path.ends_with("tree.json");
            let inner = self.0.fetch_text(path);
            Box::pin(async move {
                if slow {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                inner.await
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn half_filled_entry_is_not_served_from_cache() {
        let site = MemSite::default()
            .with("repo-cache/org__s/readme.html", "<p>s</p>")
            .with("repo-cache/org__s/tree.json", r#"{"type":"dir","name":"","children":[{"type":"file","name":"s.rs"}]}"#);
        let ctx = ServiceContext::new(Box::new(SlowTree(site)), Box::new(IdleScheduler), None, "org__");
        let modal = Modal::new(&ctx);

        let (source, (partial, served)) = tokio::join!(modal.open("org__s"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            (ctx.cache.get("org__s"), ctx.cache.get_loaded("org__s").is_some())
        });

        assert_eq!(source, ContentSource::Network);
        assert_eq!(partial.unwrap().readme, "<p>s</p>");
        assert!(!served);
        assert!(ctx.cache.get_loaded("org__s").unwrap().tree.is_some());
    }

    #[tokio::test]
    async fn failed_network_open_leaves_no_entry() {
        let ctx = context(MemSite::default(), None);
        let modal = Modal::new(&ctx);
        assert_eq!(modal.open("org__gone").await, ContentSource::Network);
        assert!(!ctx.cache.contains("org__gone"));
    }

    #[tokio::test(start_paused = true)]
    async fn double_close_restores_scroll_once() {
        let ctx = context(MemSite::default(), None);
        ctx.cache.insert(ProjectCacheEntry::loaded("org__a", String::new(), None));
        let modal = Modal::new(&ctx);
        modal.open("org__a").await;

        assert!(modal.close().await);
        assert!(!modal.close().await);

        let view = modal.view();
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!view.overlay_visible);
        assert!(!view.scroll_locked);
        assert_eq!(view.scroll_restores, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reopen_during_transition_is_not_hidden() {
        let ctx = context(MemSite::default(), None);
        ctx.cache.insert(ProjectCacheEntry::loaded("org__a", String::new(), None));
        ctx.cache.insert(ProjectCacheEntry::loaded("org__b", String::new(), None));
        let modal = Modal::new(&ctx);
        modal.open("org__a").await;

        let (hid, _) = tokio::join!(modal.close(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            modal.open("org__b").await
        });

        assert!(!hid);
        let view = modal.view();
        assert_eq!(modal.state(), ModalState::Open("org__b".into()));
        assert!(view.overlay_visible && view.active && view.scroll_locked);
        assert_eq!(view.scroll_restores, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn escape_closes_and_other_keys_do_not() {
        let ctx = context(MemSite::default(), None);
        ctx.cache.insert(ProjectCacheEntry::loaded("org__a", String::new(), None));
        let modal = Modal::new(&ctx);
        modal.open("org__a").await;

        assert!(!modal.handle_key("Enter").await);
        assert!(matches!(modal.state(), ModalState::Open(_)));
        assert!(modal.handle_key("Escape").await);
        assert!(!modal.click_backdrop().await);
    }
}
