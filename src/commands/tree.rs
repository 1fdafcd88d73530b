//! `folio tree` command.

use std::io::Read;
use std::path::Path;

use crate::model::FileTreeNode;

/// Execute the `tree` command.
///
/// Reads repository paths (as printed by `git ls-tree -r --name-only HEAD`)
/// and prints the normalized tree as pretty JSON.
///
/// # Errors
///
/// Returns an error string if the path list cannot be read.
pub fn run(paths: &Path) -> Result<(), String> {
    let listing = if paths == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read paths from stdin: {e}"))?;
        buf
    } else {
        std::fs::read_to_string(paths)
            .map_err(|e| format!("Failed to read {}: {e}", paths.display()))?
    };
    println!("{}", render(&listing)?);
    Ok(())
}

/// Builds the tree JSON for a newline-separated path listing.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn render(listing: &str) -> Result<String, String> {
    let tree = FileTreeNode::from_paths(listing.lines().map(str::trim));
    serde_json::to_string_pretty(&tree).map_err(|e| format!("Failed to serialize tree: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_emits_tagged_nodes() {
        let json = render("src/main.rs\nREADME.md\n").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "dir");
        assert_eq!(value["name"], "");
        assert_eq!(value["children"][0]["name"], "src");
        assert_eq!(value["children"][1]["type"], "file");
    }

    #[test]
    fn missing_listing_is_an_error() {
        assert!(run(Path::new("/nonexistent/paths.txt")).is_err());
    }
}
