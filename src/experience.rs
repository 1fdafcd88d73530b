//! Experience list: CSV rows rendered as tagged links.

use std::collections::HashMap;

use tracing::{error, info};

use crate::csv::parse_line;
use crate::error::LoadError;
use crate::model::{SiteBundle, EXPERIENCE_PATH};
use crate::page::{escape, Container};
use crate::ports::Fetcher;

/// One row of the experience data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceEntry {
    /// Category tag (the CSV `type` column).
    pub kind: String,
    /// Year label.
    pub year: String,
    /// Entry title.
    pub title: String,
    /// Where it happened (venue, organisation).
    pub venue: String,
    /// Link target.
    pub link: String,
}

/// An HSL colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    /// Hue in degrees.
    pub hue: u16,
    /// Saturation percent.
    pub sat: u8,
    /// Lightness percent.
    pub light: u8,
}

/// Tag colours handed out to kinds in first-seen order.
pub const TAG_COLORS: [Hsl; 8] = [
    Hsl { hue: 20, sat: 95, light: 47 },
    Hsl { hue: 177, sat: 82, light: 38 },
    Hsl { hue: 262, sat: 52, light: 47 },
    Hsl { hue: 340, sat: 82, light: 52 },
    Hsl { hue: 210, sat: 79, light: 46 },
    Hsl { hue: 145, sat: 63, light: 42 },
    Hsl { hue: 45, sat: 93, light: 47 },
    Hsl { hue: 0, sat: 72, light: 51 },
];

/// Parses CSV text into entries.
///
/// The first line is a header. Blank lines and rows with fewer than five
/// fields are skipped without comment.
#[must_use]
pub fn parse_entries(text: &str) -> Vec<ExperienceEntry> {
    text.trim()
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = parse_line(line).into_iter();
            let entry = ExperienceEntry {
                kind: fields.next()?,
                year: fields.next()?,
                title: fields.next()?,
                venue: fields.next()?,
                link: fields.next()?,
            };
            Some(entry)
        })
        .collect()
}

/// Assigns each distinct kind a palette index in first-seen order, wrapping.
#[must_use]
pub fn palette_for(entries: &[ExperienceEntry]) -> HashMap<String, usize> {
    let mut palette = HashMap::new();
    for entry in entries {
        let next = palette.len() % TAG_COLORS.len();
        palette.entry(entry.kind.clone()).or_insert(next);
    }
    palette
}

/// Renders one entry as a list item.
#[must_use]
pub fn render_entry(entry: &ExperienceEntry, color: Hsl) -> String {
    let Hsl { hue, sat, light } = color;
    format!(
        "<li><a href=\"{link}\" target=\"_blank\">\
         <span class=\"tag\" style=\"background: hsla({hue}, {sat}%, {light}%, 0.1); color: hsl({hue}, {sat}%, {light}%);\">{kind}</span>\
         <span class=\"year\">{year}</span>\
         <span class=\"title\">{title}</span>\
         <span class=\"venue\">{venue}</span>\
         </a></li>",
        link = escape(&entry.link),
        kind = escape(&entry.kind),
        year = escape(&entry.year),
        title = escape(&entry.title),
        venue = escape(&entry.venue),
    )
}

/// Fills the experience list from the bundle or the site.
pub struct ExperienceLoader<'a> {
    fetcher: &'a dyn Fetcher,
    bundle: Option<&'a SiteBundle>,
}

impl<'a> ExperienceLoader<'a> {
    /// Creates a loader preferring `bundle` over `fetcher`.
    #[must_use]
    pub fn new(fetcher: &'a dyn Fetcher, bundle: Option<&'a SiteBundle>) -> Self {
        Self { fetcher, bundle }
    }

    /// Loads, parses and renders the list into `container`.
    ///
    /// On failure the error is logged and the container is left untouched;
    /// nothing is shown to the reader. The rendered entries are returned.
    pub async fn load(&self, container: &Container) -> Vec<ExperienceEntry> {
        match self.try_load(container).await {
            Ok(entries) => entries,
            Err(err) => {
                error!(error = %err, "loading experience data");
                Vec::new()
            }
        }
    }

    async fn try_load(&self, container: &Container) -> Result<Vec<ExperienceEntry>, LoadError> {
        let text = match self.bundle.and_then(|b| b.experience.as_deref()) {
            Some(text) => text.to_string(),
            None => self.fetcher.fetch_text(EXPERIENCE_PATH).await.map_err(LoadError::Experience)?,
        };

        let entries = parse_entries(&text);
        let palette = palette_for(&entries);

        container.clear();
        for entry in &entries {
            let index = palette.get(&entry.kind).copied().unwrap_or(0);
            container.append(render_entry(entry, TAG_COLORS[index]));
        }
        info!(count = entries.len(), "rendered experience entries");
        Ok(entries)
    }
}
