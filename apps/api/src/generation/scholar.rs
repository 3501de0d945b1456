//! Scholar generation: research topics, literature-review outline, abstract
//! draft and formatted citations for an academic field.
//!
//! Citations never go through the model: they are formatted locally from the
//! literature table so every reference line is traceable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::fallback::{complete_or_fallback, non_empty, parse_lines, PromptSpec, Section};
use crate::generation::prompts::{
    render_prompt, ABSTRACT_PROMPT, LITERATURE_REVIEW_PROMPT, RESEARCH_TOPICS_PROMPT,
    SCHOLAR_SYSTEM,
};
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::{CompletionOptions, LanguageModel};
use crate::synth::citation::style_names;
use crate::synth::synthesizer::RESEARCH_TOPIC_COUNT;
use crate::synth::template::slot_values;
use crate::synth::{SynthError, Synthesizer};

const TOPICS_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.7,
    max_tokens: 500,
};
const REVIEW_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.6,
    max_tokens: 1000,
};
const ABSTRACT_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.6,
    max_tokens: 600,
};

/// Optional scholar sections. Topics and citations are always produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScholarSection {
    Review,
    Abstract,
}

fn default_sections() -> Vec<ScholarSection> {
    vec![ScholarSection::Review, ScholarSection::Abstract]
}

fn default_citation_style() -> String {
    "APA 7th".to_string()
}

/// Request body for scholar generation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScholarRequest {
    pub field: String,
    pub core_problem: String,
    #[serde(default = "default_citation_style")]
    pub citation_style: String,
    #[serde(default = "default_sections")]
    pub sections: Vec<ScholarSection>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ScholarRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.field.trim().is_empty() || self.core_problem.trim().is_empty() {
            return Err(AppError::Validation(
                "field and core_problem are both required".to_string(),
            ));
        }
        if !style_names().any(|s| s == self.citation_style) {
            return Err(SynthError::UnknownCitationStyle(self.citation_style.clone()).into());
        }
        Ok(())
    }

    fn wants(&self, section: ScholarSection) -> bool {
        self.sections.contains(&section)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScholarDraft {
    pub topics: Section<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Section<String>>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_draft: Option<Section<String>>,
    pub citations: Vec<String>,
}

pub async fn generate_scholar<R: Rng + Send>(
    llm: Option<&dyn LanguageModel>,
    synth: &Synthesizer,
    request: &ScholarRequest,
    rng: &mut R,
) -> Result<ScholarDraft, AppError> {
    request.validate()?;

    let field = request.field.trim();
    let problem = request.core_problem.trim();
    let literature = synth.literature(field);
    let system = system_prompt(SCHOLAR_SYSTEM);

    let topics_prompt = PromptSpec {
        system: system.clone(),
        user: render_prompt(
            RESEARCH_TOPICS_PROMPT,
            &slot_values([("field", field), ("problem", problem)]),
        )?,
        options: TOPICS_OPTIONS,
    };
    let topics = complete_or_fallback(
        llm,
        "research topics",
        &topics_prompt,
        |text| non_empty(parse_lines(text, RESEARCH_TOPIC_COUNT)),
        || synth.research_topics(field, problem, rng),
    )
    .await?;

    let review = if request.wants(ScholarSection::Review) {
        let listing = literature
            .iter()
            .map(|e| format!("- {}: {} ({})", e.label, e.title, e.venue))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = PromptSpec {
            system: system.clone(),
            user: render_prompt(
                LITERATURE_REVIEW_PROMPT,
                &slot_values([
                    ("field", field),
                    ("problem", problem),
                    ("literature", listing.as_str()),
                ]),
            )?,
            options: REVIEW_OPTIONS,
        };
        Some(
            complete_or_fallback(
                llm,
                "literature review",
                &prompt,
                trimmed,
                || synth.literature_review(field, problem, rng),
            )
            .await?,
        )
    } else {
        None
    };

    let abstract_draft = if request.wants(ScholarSection::Abstract) {
        let topic = topics.value.first().map(String::as_str).unwrap_or(problem);
        let prompt = PromptSpec {
            system,
            user: render_prompt(
                ABSTRACT_PROMPT,
                &slot_values([("field", field), ("problem", problem), ("topic", topic)]),
            )?,
            options: ABSTRACT_OPTIONS,
        };
        Some(
            complete_or_fallback(
                llm,
                "abstract",
                &prompt,
                trimmed,
                || synth.abstract_draft(field, problem, topic, rng),
            )
            .await?,
        )
    } else {
        None
    };

    let citations = synth.citations(field, &request.citation_style)?;

    Ok(ScholarDraft {
        topics,
        review,
        abstract_draft,
        citations,
    })
}

fn trimmed(text: &str) -> Option<String> {
    Some(text.trim().to_string()).filter(|t| !t.is_empty())
}
