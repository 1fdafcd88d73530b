//! Display information derived from a repository's cached files.
//!
//! Everything here is a pure function of its inputs: the same slug, readme,
//! metadata and tree always give byte-identical output.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{FileTreeNode, RepoMeta};

/// Maximum description length in characters before truncation.
pub const DESCRIPTION_LIMIT: usize = 150;
/// Maximum number of language tags on a card.
pub const TAG_LIMIT: usize = 3;
/// Description used when the readme has no usable paragraph.
pub const FALLBACK_DESCRIPTION: &str = "No description available.";
/// Tag used when no file extension maps to a language.
pub const FALLBACK_TAG: &str = "Project";
/// Link used when metadata lacks owner or repository name.
pub const PLACEHOLDER_LINK: &str = "#";

/// File extension to language name.
const LANGUAGES: &[(&str, &str)] = &[
    ("py", "Python"),
    ("ipynb", "Jupyter"),
    ("js", "JavaScript"),
    ("jsx", "React"),
    ("ts", "TypeScript"),
    ("tsx", "React"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("vue", "Vue"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("c", "C"),
    ("h", "C"),
    ("cpp", "C++"),
    ("hpp", "C++"),
    ("cs", "C#"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("swift", "Swift"),
    ("dart", "Dart"),
    ("sh", "Shell"),
    ("r", "R"),
    ("m", "MATLAB"),
    ("sql", "SQL"),
];

/// What a project card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDisplayInfo {
    /// Slug without the organisational prefix.
    pub title: String,
    /// Short description, at most [`DESCRIPTION_LIMIT`] chars plus an ellipsis.
    pub description: String,
    /// CSS `linear-gradient(...)` keyed by the title.
    pub visual: String,
    /// Up to [`TAG_LIMIT`] language names in discovery order.
    pub tags: Vec<String>,
    /// GitHub URL or [`PLACEHOLDER_LINK`].
    pub github_link: String,
    /// Cache directory name, i.e. the slug.
    pub folder_name: String,
}

/// Derives the card contents for one repository.
#[must_use]
pub fn extract(
    slug: &str,
    readme_html: &str,
    meta: Option<&RepoMeta>,
    tree: Option<&FileTreeNode>,
    title_prefix: &str,
) -> ProjectDisplayInfo {
    let title = title_for(slug, title_prefix);
    ProjectDisplayInfo {
        description: description_from(readme_html),
        visual: gradient_for(&title),
        tags: tags_for(tree),
        github_link: github_link(meta),
        folder_name: slug.to_string(),
        title,
    }
}

/// Strips `prefix` from `slug` when present.
#[must_use]
pub fn title_for(slug: &str, prefix: &str) -> String {
    slug.strip_prefix(prefix).filter(|rest| !rest.is_empty()).unwrap_or(slug).to_string()
}

fn paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").expect("valid paragraph regex"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

/// Plain text of an HTML fragment: tags removed, common entities decoded,
/// whitespace collapsed.
#[must_use]
pub fn plain_text(fragment: &str) -> String {
    let stripped = tag_re().replace_all(fragment, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First paragraph longer than 10 chars that is not a bare link, truncated.
#[must_use]
pub fn description_from(readme_html: &str) -> String {
    paragraph_re()
        .captures_iter(readme_html)
        .map(|caps| plain_text(&caps[1]))
        .find(|text| text.chars().count() > 10 && !text.starts_with("http"))
        .map_or_else(|| FALLBACK_DESCRIPTION.to_string(), |text| truncate(&text))
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_LIMIT {
        return text.to_string();
    }
    let cut: String = text.chars().take(DESCRIPTION_LIMIT).collect();
    format!("{cut}...")
}

/// Multiply-shift string hash over UTF-16 code units (`h = c + (h << 5) - h`).
#[must_use]
pub fn string_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// Two-stop gradient whose colours depend only on `key`.
#[must_use]
pub fn gradient_for(key: &str) -> String {
    let hash = string_hash(key);
    let hue1 = hash.unsigned_abs() % 360;
    let hue2 = (hash >> 8).unsigned_abs() % 360;
    let sat = 65 + (hash >> 16).unsigned_abs() % 20;
    let light = 20 + (hash >> 4).unsigned_abs() % 15;
    format!(
        "linear-gradient(135deg, hsl({hue1}, {sat}%, {light}%) 0%, hsl({hue2}, {sat}%, {light}%) 100%)"
    )
}

/// `https://github.com/<owner>/<repo>` when both are known.
#[must_use]
pub fn github_link(meta: Option<&RepoMeta>) -> String {
    match meta {
        Some(RepoMeta { owner: Some(owner), repo: Some(repo), .. })
            if !owner.is_empty() && !repo.is_empty() =>
        {
            format!("https://github.com/{owner}/{repo}")
        }
        _ => PLACEHOLDER_LINK.to_string(),
    }
}

/// Language for a file name, by extension.
#[must_use]
pub fn language_for(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    LANGUAGES.iter().find(|(e, _)| *e == ext).map(|(_, lang)| *lang)
}

/// Distinct languages found walking the tree in order, capped at
/// [`TAG_LIMIT`].
#[must_use]
pub fn tags_for(tree: Option<&FileTreeNode>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for name in tree.map(FileTreeNode::file_names).unwrap_or_default() {
        if tags.len() == TAG_LIMIT {
            break;
        }
        if let Some(lang) = language_for(name) {
            if !tags.iter().any(|t| t == lang) {
                tags.push(lang.to_string());
            }
        }
    }
    if tags.is_empty() {
        tags.push(FALLBACK_TAG.to_string());
    }
    tags
}
