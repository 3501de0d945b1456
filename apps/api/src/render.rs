//! Plain-text export bundles for generated drafts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::generation::notes::NoteDraft;
use crate::generation::scholar::ScholarDraft;

pub const NOTE_EXPORT_PREFIX: &str = "SocialNote";
pub const SCHOLAR_EXPORT_PREFIX: &str = "ScholarMind";
pub const EXPORT_MIME: &str = "text/plain";

/// A downloadable text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportBundle {
    pub filename: String,
    pub mime: String,
    pub content: String,
}

/// `<prefix>_<subject>_<YYYYmmdd_HHMMSS>.txt`, with path-hostile characters
/// in the subject replaced by `-`.
pub fn export_filename(prefix: &str, subject: &str, at: DateTime<Utc>) -> String {
    format!(
        "{prefix}_{}_{}.txt",
        sanitize(subject),
        at.format("%Y%m%d_%H%M%S")
    )
}

fn sanitize(subject: &str) -> String {
    subject
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}

pub fn note_export(topic: &str, draft: &NoteDraft, at: DateTime<Utc>) -> ExportBundle {
    let tags = draft
        .tags
        .value
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");
    let content = format!(
        "[Social note]\nTitles:\n{}\n\nBody:\n{}\n\nTags: {tags}",
        draft.titles.value.join("\n"),
        draft.body.value,
    );

    ExportBundle {
        filename: export_filename(NOTE_EXPORT_PREFIX, topic, at),
        mime: EXPORT_MIME.to_string(),
        content,
    }
}

/// Sections the caller skipped are left out of the export.
pub fn scholar_export(field: &str, draft: &ScholarDraft, at: DateTime<Utc>) -> ExportBundle {
    let mut parts = vec![
        "=== Research topics ===".to_string(),
        draft.topics.value.join("\n"),
    ];
    if let Some(review) = &draft.review {
        parts.push("=== Literature review outline ===".to_string());
        parts.push(review.value.clone());
    }
    if let Some(abstract_draft) = &draft.abstract_draft {
        parts.push("=== Abstract draft ===".to_string());
        parts.push(abstract_draft.value.clone());
    }
    parts.push("=== Citations ===".to_string());
    parts.push(
        draft
            .citations
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. {c}", i + 1))
            .collect::<Vec<_>>()
            .join("\n"),
    );

    ExportBundle {
        filename: export_filename(SCHOLAR_EXPORT_PREFIX, field, at),
        mime: EXPORT_MIME.to_string(),
        content: parts.join("\n\n"),
    }
}
