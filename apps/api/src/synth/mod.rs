// Fallback content synthesizer.
// Pure functions over read-only tables plus an explicit random source.
// No I/O here except `TableSet::load`, which runs once at start-up.

pub mod citation;
pub mod pool;
pub mod synthesizer;
pub mod tables;
pub mod template;
pub mod vocab;

use thiserror::Error;

pub use citation::{format_citation, CitationEntry};
pub use pool::{select_templates, TemplatePool, DEFAULT_CATEGORY};
pub use synthesizer::Synthesizer;
pub use tables::TableSet;
pub use template::{fill_template, SlotValues, Template};
pub use vocab::pick_random;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("template slot '{slot}' has no value")]
    MissingSlot { slot: String },

    #[error("cannot pick from an empty vocabulary")]
    EmptyVocabulary,

    #[error("unknown citation style '{0}'")]
    UnknownCitationStyle(String),

    #[error("unknown template pool '{0}'")]
    UnknownPool(String),

    #[error("template pool '{pool}' has no 'default' category")]
    MissingDefaultCategory { pool: String },

    #[error("template {template:?} in pool '{pool}' uses slot '{slot}', which no caller or vocabulary supplies")]
    UnfillableSlot {
        pool: String,
        template: String,
        slot: String,
    },

    #[error("vocabulary '{slot}' is empty")]
    EmptyVocabularyTable { slot: String },

    #[error("invalid template {template:?}: {reason}")]
    TemplateSyntax { template: String, reason: String },

    #[error("literature for '{field}' has {available} entries, at least {needed} required")]
    InsufficientLiterature {
        field: String,
        needed: usize,
        available: usize,
    },

    #[error("failed to load tables: {0}")]
    TableLoad(String),
}
