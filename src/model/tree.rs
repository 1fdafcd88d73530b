//! Repository file trees.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One node of a repository file tree.
///
/// Serialized as `{"type": "file" | "dir", "name": ..., "children": [...]}`.
/// The root directory carries an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileTreeNode {
    /// A regular file.
    File {
        /// File name including extension.
        name: String,
    },
    /// A directory and its ordered children.
    Dir {
        /// Directory name; empty for the root.
        #[serde(default)]
        name: String,
        /// Child nodes in display order.
        #[serde(default)]
        children: Vec<FileTreeNode>,
    },
}

impl FileTreeNode {
    /// Name of this node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name } | Self::Dir { name, .. } => name,
        }
    }

    /// File names in pre-order (directories first in their listed order).
    #[must_use]
    pub fn file_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::File { name } => out.push(name),
            Self::Dir { children, .. } => {
                for child in children {
                    child.collect_files(out);
                }
            }
        }
    }

    /// Builds a normalized tree from slash-separated repository paths.
    ///
    /// Children are sorted directories first, then by lowercase name. Empty
    /// path segments are ignored.
    #[must_use]
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = Builder::default();
        for path in paths {
            let parts: Vec<&str> = path.as_ref().split('/').filter(|p| !p.is_empty()).collect();
            let Some((last, dirs)) = parts.split_last() else {
                continue;
            };
            let mut node = &mut root;
            for dir in dirs {
                node = node.dirs.entry((*dir).to_string()).or_default();
            }
            node.files.insert((*last).to_string());
        }
        root.into_node(String::new())
    }
}

#[derive(Default)]
struct Builder {
    dirs: BTreeMap<String, Builder>,
    files: BTreeSet<String>,
}

impl Builder {
    fn into_node(self, name: String) -> FileTreeNode {
        let mut dirs: Vec<(String, Builder)> = self.dirs.into_iter().collect();
        dirs.sort_by_key(|(name, _)| name.to_lowercase());
        let mut files: Vec<String> =
            self.files.into_iter().filter(|f| !dirs.iter().any(|(d, _)| d == f)).collect();
        files.sort_by_key(|name| name.to_lowercase());

        let mut children: Vec<FileTreeNode> =
            dirs.into_iter().map(|(name, b)| b.into_node(name)).collect();
        children.extend(files.into_iter().map(|name| FileTreeNode::File { name }));
        FileTreeNode::Dir { name, children }
    }
}
