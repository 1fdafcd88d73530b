//! In-memory project cache shared by the catalog loader, the prefetcher and
//! the modal.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::model::FileTreeNode;

/// Detail data cached for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCacheEntry {
    /// Repository slug.
    pub slug: String,
    /// README HTML; empty when unavailable.
    pub readme: String,
    /// File tree, when one was fetched.
    pub tree: Option<FileTreeNode>,
    /// Whether the entry holds a completed fetch.
    pub loaded: bool,
}

impl ProjectCacheEntry {
    /// A completed entry.
    #[must_use]
    pub fn loaded(slug: impl Into<String>, readme: String, tree: Option<FileTreeNode>) -> Self {
        Self { slug: slug.into(), readme, tree, loaded: true }
    }
}

/// Slug-keyed cache, alive for the whole session and never invalidated.
///
/// Every write replaces a whole entry under the lock, so concurrent writers
/// only race on which complete version ends up stored.
#[derive(Debug, Default)]
pub struct ProjectCache {
    entries: Mutex<HashMap<String, ProjectCacheEntry>>,
}

impl ProjectCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the entry for `slug`.
    ///
    /// # Panics
    ///
    /// Panics if the lock was poisoned by a panicking writer.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<ProjectCacheEntry> {
        self.entries.lock().expect("cache lock poisoned").get(slug).cloned()
    }

    /// Returns the entry for `slug` only if it is marked loaded.
    #[must_use]
    pub fn get_loaded(&self, slug: &str) -> Option<ProjectCacheEntry> {
        self.get(slug).filter(|entry| entry.loaded)
    }

    /// Whether any entry exists for `slug`.
    ///
    /// # Panics
    ///
    /// Panics if the lock was poisoned by a panicking writer.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.entries.lock().expect("cache lock poisoned").contains_key(slug)
    }

    /// Stores `entry`, replacing any previous one for the same slug.
    ///
    /// # Panics
    ///
    /// Panics if the lock was poisoned by a panicking writer.
    pub fn insert(&self, entry: ProjectCacheEntry) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(entry.slug.clone(), entry);
    }

    /// Updates one field of the entry for `slug`, creating it if absent.
    ///
    /// Used by the modal's network path, where readme and tree resolve
    /// independently. A newly created entry stays unloaded until
    /// [`mark_loaded`](Self::mark_loaded), so a half-filled entry is never
    /// served.
    ///
    /// # Panics
    ///
    /// Panics if the lock was poisoned by a panicking writer.
    pub fn backfill(&self, slug: &str, update: impl FnOnce(&mut ProjectCacheEntry)) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let entry = entries
            .entry(slug.to_string())
            .or_insert_with(|| ProjectCacheEntry { slug: slug.to_string(), ..Default::default() });
        update(entry);
    }

    /// Marks the entry for `slug` loaded. Returns false if there is none.
    ///
    /// # Panics
    ///
    /// Panics if the lock was poisoned by a panicking writer.
    pub fn mark_loaded(&self, slug: &str) -> bool {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.get_mut(slug).map(|entry| entry.loaded = true).is_some()
    }

    /// Number of cached slugs.
    ///
    /// # Panics
    ///
    /// Panics if the lock was poisoned by a panicking writer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
