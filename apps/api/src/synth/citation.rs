//! Citation formatting for literature table entries.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::synth::template::slot_values;
use crate::synth::{SynthError, Template};

/// Year used when an author label carries no four-digit year.
pub const DEFAULT_YEAR: &str = "2024";

/// Registered citation styles: (name, format template).
/// Authors are passed without a trailing period; each format supplies its own.
pub const CITATION_STYLES: &[(&str, &str)] = &[
    ("APA 7th", "{authors}. ({year}). {title}. {journal}."),
    ("GB/T 7714", "{authors}. {title}[J]. {journal}, {year}."),
    (
        "MLA 9th",
        "{authors}. \"{title}\". {journal}, vol. XX, no. XX, {year}, pp. XX-XX.",
    ),
];

/// A literature table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationEntry {
    /// Author-year label, e.g. "Li et al., 2024".
    pub label: String,
    pub title: String,
    pub venue: String,
}

impl CitationEntry {
    pub fn new(label: &str, title: &str, venue: &str) -> Self {
        Self {
            label: label.to_string(),
            title: title.to_string(),
            venue: venue.to_string(),
        }
    }

    /// First standalone four-digit token in the label.
    pub fn year(&self) -> Option<&str> {
        find_year(&self.label)
    }

    /// The label with its year and trailing punctuation removed.
    pub fn authors(&self) -> String {
        let without_year = match year_span(&self.label) {
            Some(span) => format!("{}{}", &self.label[..span.start], &self.label[span.end..])
                .replace("()", ""),
            None => self.label.clone(),
        };
        without_year
            .trim()
            .trim_end_matches(|c: char| c == ',' || c == '.' || c.is_whitespace())
            .to_string()
    }
}

pub fn style_names() -> impl Iterator<Item = &'static str> {
    CITATION_STYLES.iter().map(|(name, _)| *name)
}

/// Formats `entry` in the named style.
pub fn format_citation(entry: &CitationEntry, style_name: &str) -> Result<String, SynthError> {
    let format = CITATION_STYLES
        .iter()
        .find(|(name, _)| *name == style_name)
        .map(|(_, format)| *format)
        .ok_or_else(|| SynthError::UnknownCitationStyle(style_name.to_string()))?;

    let authors = entry.authors();
    let year = entry.year().unwrap_or(DEFAULT_YEAR);

    Template::parse(format)?.fill(&slot_values([
        ("authors", authors.as_str()),
        ("year", year),
        ("title", entry.title.as_str()),
        ("journal", entry.venue.as_str()),
    ]))
}

fn find_year(label: &str) -> Option<&str> {
    year_span(label).map(|span| &label[span])
}

/// Byte range of the first token of exactly four ASCII digits bounded by
/// non-alphanumeric characters or the ends of the label.
fn year_span(label: &str) -> Option<Range<usize>> {
    let mut start = None;
    let ends = label.char_indices().chain(std::iter::once((label.len(), ' ')));
    for (i, c) in ends {
        if c.is_alphanumeric() {
            start.get_or_insert(i);
            continue;
        }
        if let Some(s) = start.take() {
            let token = &label[s..i];
            if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
                return Some(s..i);
            }
        }
    }
    None
}
