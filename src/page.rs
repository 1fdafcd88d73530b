//! Page sections the loaders render into.
//!
//! A [`Container`] is an ordered list of HTML fragments standing in for a DOM
//! element's children. Loaders only ever clear, append, or replace them.

use std::sync::Mutex;

/// Ordered HTML fragments of one page section.
#[derive(Debug, Default)]
pub struct Container {
    items: Mutex<Vec<String>>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_items<R>(&self, f: impl FnOnce(&mut Vec<String>) -> R) -> R {
        let mut items = self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut items)
    }

    /// Removes every fragment.
    pub fn clear(&self) {
        self.with_items(Vec::clear);
    }

    /// Appends one fragment.
    pub fn append(&self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        self.with_items(|items| items.push(fragment));
    }

    /// Replaces all content with a single fragment.
    pub fn set(&self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        self.with_items(|items| {
            items.clear();
            items.push(fragment);
        });
    }

    /// Copy of the current fragments.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        self.with_items(|items| items.clone())
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_items(|items| items.len())
    }

    /// Whether the container has no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All fragments concatenated, one per line.
    #[must_use]
    pub fn html(&self) -> String {
        self.with_items(|items| items.join("\n"))
    }
}

/// The sections populated on page load.
#[derive(Debug, Default)]
pub struct Page {
    /// The experience list (`.unified-list`).
    pub experience: Container,
    /// The project card grid.
    pub projects: Container,
}

impl Page {
    /// Creates a page with empty sections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders both sections as a standalone HTML document body.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "<ul class=\"unified-list\">\n{}\n</ul>\n<div class=\"projects-grid\">\n{}\n</div>\n",
            self.experience.html(),
            self.projects.html()
        )
    }
}

/// Escapes text for safe inclusion in HTML content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
