//! Named-slot templates.
//!
//! A template is parsed once into literal and slot segments, so filling never
//! rescans substituted values and missing slots are detected exactly.
//! Syntax: `{name}` is a slot, `{{` and `}}` are literal braces.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::synth::SynthError;

/// Values bound to slot names for a single fill.
pub type SlotValues = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// A parsed template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source`, rejecting unbalanced braces and empty or malformed slot names.
    pub fn parse(source: &str) -> Result<Self, SynthError> {
        let syntax_error = |reason: &str| SynthError::TemplateSyntax {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(syntax_error("unclosed '{'"));
                    }
                    if !is_slot_name(&name) {
                        return Err(syntax_error(&format!("invalid slot name '{name}'")));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(name));
                }
                '}' => return Err(syntax_error("unmatched '}'")),
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Distinct slot names referenced by this template, sorted.
    pub fn slots(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitutes every slot with its value. Values are inserted verbatim.
    pub fn fill(&self, values: &SlotValues) -> Result<String, SynthError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name) => {
                    let value = values
                        .get(name)
                        .ok_or_else(|| SynthError::MissingSlot { slot: name.clone() })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Fills `template` with `values`.
pub fn fill_template(template: &Template, values: &SlotValues) -> Result<String, SynthError> {
    template.fill(values)
}

fn is_slot_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Template::parse(&source).map_err(serde::de::Error::custom)
    }
}

/// Builds a `SlotValues` map from `(name, value)` pairs.
pub fn slot_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> SlotValues {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
