//! Social note generation: titles, body and hashtags.
//!
//! Sectioned mode asks the model once per section and falls back per section.
//! One-shot mode asks for the whole note in one call and splits the reply;
//! any part missing from the reply comes from the synthesizer.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::fallback::{
    complete_or_fallback, model_or_fallback, non_empty, parse_lines, parse_tags, PromptSpec,
    Section,
};
use crate::generation::prompts::{
    render_prompt, NOTE_BODY_PROMPT, NOTE_BODY_SYSTEM, NOTE_ONE_SHOT_PROMPT, NOTE_ONE_SHOT_SYSTEM,
    NOTE_TAGS_PROMPT, NOTE_TAGS_SYSTEM, NOTE_TITLES_PROMPT, NOTE_TITLES_SYSTEM,
};
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::{CompletionOptions, LanguageModel};
use crate::synth::synthesizer::{NOTE_TAG_COUNT, NOTE_TITLE_COUNT};
use crate::synth::tables::{BUBBLY, PRODUCT_PICKS};
use crate::synth::template::{slot_values, SlotValues};
use crate::synth::Synthesizer;

pub const MAX_TOPIC_CHARS: usize = 100;
/// Model titles longer than this are discarded.
pub const MAX_TITLE_CHARS: usize = 60;

/// Content categories a note can be filed under.
pub const NOTE_CATEGORIES: &[&str] = &[
    "Beauty",
    "Food",
    "Career",
    "Travel",
    "Tech",
    "Education",
    "Health",
    "Fashion",
    "Home",
    "Other",
];

/// Suggested styles for one-shot notes. Any style text is accepted.
pub const ONE_SHOT_STYLES: &[&str] = &[
    "Recommendation",
    "Practical",
    "Review",
    "Emotional",
    "Funny",
    "Healing",
    "Tutorial",
    "Shop Visit",
];

pub const ONE_SHOT_TITLE_COUNT: usize = 5;
pub const ONE_SHOT_TAG_COUNT: usize = 5;

const NOTE_TEMPERATURE: f32 = 0.8;
const ONE_SHOT_TEMPERATURE: f32 = 0.7;

/// How the model is asked for a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteMode {
    /// One call per section: 3 titles, body, 10 tags.
    #[default]
    Sectioned,
    /// One call for the whole note: 5 titles, body, 5 tags.
    OneShot,
}

impl NoteMode {
    pub const ALL: [NoteMode; 2] = [NoteMode::Sectioned, NoteMode::OneShot];
}

/// Body length preset; drives the token budget of the body call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl NoteLength {
    pub const ALL: [NoteLength; 3] = [NoteLength::Short, NoteLength::Medium, NoteLength::Long];

    pub fn max_tokens(self) -> u32 {
        match self {
            NoteLength::Short => 300,
            NoteLength::Medium => 500,
            NoteLength::Long => 800,
        }
    }

    fn hint(self) -> &'static str {
        match self {
            NoteLength::Short => "under 100 words",
            NoteLength::Medium => "around 200 words",
            NoteLength::Long => "around 300 words",
        }
    }
}

fn default_scene() -> String {
    PRODUCT_PICKS.to_string()
}

fn default_style() -> String {
    BUBBLY.to_string()
}

fn default_category() -> String {
    NOTE_CATEGORIES[0].to_string()
}

/// Request body for note generation.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteRequest {
    pub topic: String,
    #[serde(default = "default_scene")]
    pub scene: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub length: NoteLength,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub mode: NoteMode,
    /// Overrides the configured key for this request only.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NoteRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(AppError::Validation("topic cannot be empty".to_string()));
        }
        if topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(AppError::Validation(format!(
                "topic must be at most {MAX_TOPIC_CHARS} characters"
            )));
        }
        if !NOTE_CATEGORIES.contains(&self.category.trim()) {
            return Err(AppError::Validation(format!(
                "unknown category '{}', expected one of: {}",
                self.category,
                NOTE_CATEGORIES.join(", ")
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteDraft {
    pub titles: Section<Vec<String>>,
    pub body: Section<String>,
    pub tags: Section<Vec<String>>,
}

/// Generates all three note sections in the requested mode.
pub async fn generate_note<R: Rng + Send>(
    llm: Option<&dyn LanguageModel>,
    synth: &Synthesizer,
    request: &NoteRequest,
    rng: &mut R,
) -> Result<NoteDraft, AppError> {
    request.validate()?;

    let values = slot_values([
        ("topic", request.topic.trim()),
        ("scene", request.scene.trim()),
        ("style", request.style.trim()),
        ("category", request.category.trim()),
        ("length_hint", request.length.hint()),
    ]);
    match request.mode {
        NoteMode::Sectioned => generate_sectioned(llm, synth, request, &values, rng).await,
        NoteMode::OneShot => generate_one_shot(llm, synth, request, &values, rng).await,
    }
}

async fn generate_sectioned<R: Rng + Send>(
    llm: Option<&dyn LanguageModel>,
    synth: &Synthesizer,
    request: &NoteRequest,
    values: &SlotValues,
    rng: &mut R,
) -> Result<NoteDraft, AppError> {
    let topic = request.topic.trim();
    let scene = request.scene.trim();
    let style = request.style.trim();
    let options = CompletionOptions {
        temperature: NOTE_TEMPERATURE,
        max_tokens: 500,
    };

    let titles_prompt = PromptSpec {
        system: system_prompt(&render_prompt(NOTE_TITLES_SYSTEM, values)?),
        user: render_prompt(NOTE_TITLES_PROMPT, values)?,
        options,
    };
    let titles = complete_or_fallback(
        llm,
        "titles",
        &titles_prompt,
        |text| non_empty(usable_titles(text, NOTE_TITLE_COUNT)),
        || synth.note_titles(scene, topic, rng),
    )
    .await?;

    let body_prompt = PromptSpec {
        system: system_prompt(&render_prompt(NOTE_BODY_SYSTEM, values)?),
        user: render_prompt(NOTE_BODY_PROMPT, values)?,
        options: CompletionOptions {
            max_tokens: request.length.max_tokens(),
            ..options
        },
    };
    let body = complete_or_fallback(
        llm,
        "body",
        &body_prompt,
        |text| Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        || synth.note_body(style, topic, rng),
    )
    .await?;

    let tags_prompt = PromptSpec {
        system: system_prompt(NOTE_TAGS_SYSTEM),
        user: render_prompt(NOTE_TAGS_PROMPT, values)?,
        options,
    };
    let tags = complete_or_fallback(
        llm,
        "tags",
        &tags_prompt,
        |text| non_empty(parse_tags(text, NOTE_TAG_COUNT)),
        || synth.note_tags(scene, topic, rng),
    )
    .await?;

    Ok(NoteDraft { titles, body, tags })
}

async fn generate_one_shot<R: Rng + Send>(
    llm: Option<&dyn LanguageModel>,
    synth: &Synthesizer,
    request: &NoteRequest,
    values: &SlotValues,
    rng: &mut R,
) -> Result<NoteDraft, AppError> {
    let topic = request.topic.trim();
    let scene = request.scene.trim();
    let style = request.style.trim();

    let parts = match llm {
        Some(llm) => {
            let system = system_prompt(&render_prompt(NOTE_ONE_SHOT_SYSTEM, values)?);
            let user = render_prompt(NOTE_ONE_SHOT_PROMPT, values)?;
            let options = CompletionOptions {
                temperature: ONE_SHOT_TEMPERATURE,
                max_tokens: request.length.max_tokens(),
            };
            match llm.complete(&system, &user, &options).await {
                Ok(text) => {
                    info!("Generated one-shot note with {}", llm.model());
                    split_one_shot(&text)
                }
                Err(e) => {
                    warn!("one-shot note generation failed, using fallback templates: {e}");
                    OneShotParts::default()
                }
            }
        }
        None => OneShotParts::default(),
    };

    let titles = model_or_fallback(non_empty(parts.titles), || {
        synth.note_titles(scene, topic, rng)
    })?;
    let body = model_or_fallback(Some(parts.body).filter(|b| !b.is_empty()), || {
        synth.note_body(style, topic, rng)
    })?;
    let tags = model_or_fallback(non_empty(parts.tags), || {
        let mut tags = synth.note_tags(scene, topic, rng)?;
        tags.truncate(ONE_SHOT_TAG_COUNT);
        Ok(tags)
    })?;

    Ok(NoteDraft { titles, body, tags })
}

/// Model titles within the length limit, list markers stripped.
fn usable_titles(text: &str, count: usize) -> Vec<String> {
    parse_lines(text, usize::MAX)
        .into_iter()
        .filter(|t| t.chars().count() <= MAX_TITLE_CHARS)
        .take(count)
        .collect()
}

#[derive(Debug, Default)]
struct OneShotParts {
    titles: Vec<String>,
    body: String,
    tags: Vec<String>,
}

/// Splits a one-shot reply: the first block of lines holds the titles, lines
/// made only of hashtags hold the tags, everything else is the body.
fn split_one_shot(text: &str) -> OneShotParts {
    let mut tag_lines = Vec::new();
    let mut content = Vec::new();
    for line in text.lines().map(str::trim) {
        if is_section_label(line) {
            continue;
        }
        if !line.is_empty() && line.split_whitespace().all(|t| t.starts_with('#')) {
            tag_lines.push(line);
        } else {
            content.push(line);
        }
    }

    let mut lines = content.into_iter().skip_while(|l| l.is_empty());
    let title_block: Vec<&str> = lines.by_ref().take_while(|l| !l.is_empty()).collect();
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    OneShotParts {
        titles: usable_titles(&title_block.join("\n"), ONE_SHOT_TITLE_COUNT),
        body,
        tags: parse_tags(&tag_lines.join(" "), ONE_SHOT_TAG_COUNT),
    }
}

/// Headings such as "## Titles" or "Tags:" that models add around sections.
fn is_section_label(line: &str) -> bool {
    let label = line
        .trim_start_matches('#')
        .trim()
        .trim_end_matches(|c: char| c == ':' || c == '：')
        .to_ascii_lowercase();
    matches!(label.as_str(), "title" | "titles" | "body" | "tags" | "hashtags")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::fallback::test_support::ScriptedModel;
    use crate::generation::fallback::ContentSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(topic: &str) -> NoteRequest {
        serde_json::from_value(serde_json::json!({
            "topic": topic,
            "scene": "Travel Guide",
            "style": "Gentle",
            "length": "long",
            "category": "Travel"
        }))
        .unwrap()
    }

    fn synth() -> Synthesizer {
        Synthesizer::builtin().unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let req: NoteRequest = serde_json::from_str(r#"{"topic": "sunscreen"}"#).unwrap();
        assert_eq!(req.scene, "Product Picks");
        assert_eq!(req.style, "Bubbly");
        assert_eq!(req.length, NoteLength::Medium);
        assert_eq!(req.category, "Beauty");
        assert_eq!(req.mode, NoteMode::Sectioned);
        assert!(req.api_key.is_none());
        assert!(req.seed.is_none());
    }

    #[test]
    fn test_length_budgets() {
        assert_eq!(NoteLength::Short.max_tokens(), 300);
        assert_eq!(NoteLength::Medium.max_tokens(), 500);
        assert_eq!(NoteLength::Long.max_tokens(), 800);
    }

    #[test]
    fn test_validation() {
        assert!(request("   ").validate().is_err());
        assert!(request(&"x".repeat(MAX_TOPIC_CHARS + 1)).validate().is_err());
        assert!(request("Xiamen").validate().is_ok());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut req = request("Xiamen");
        req.category = "Gardening".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
        req.category = "Travel".to_string();
        assert!(req.validate().is_ok());
    }

    #[tokio::test]
    async fn test_without_model_everything_falls_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let draft = generate_note(None, &synth(), &request("Xiamen"), &mut rng)
            .await
            .unwrap();
        assert_eq!(draft.titles.source, ContentSource::Fallback);
        assert_eq!(draft.titles.value.len(), 3);
        assert!(draft.titles.value.iter().all(|t| t.contains("Xiamen")));
        assert!(draft.body.value.contains("Xiamen"));
        assert!(draft.body.value.contains("💛"));
        assert_eq!(draft.tags.value.len(), 10);
        assert_eq!(draft.tags.value[0], "TravelGuide");
    }

    #[tokio::test]
    async fn test_model_sections_are_parsed() {
        let model = ScriptedModel::new(vec![
            Some("1. Xiamen in 3 days ✨\n2. Hidden Xiamen 🤫\n3. Xiamen on a budget 💸\n4. extra"),
            Some("Xiamen stole my heart 💛"),
            Some("#Xiamen #TravelGuide #Island"),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        let draft = generate_note(Some(&model), &synth(), &request("Xiamen"), &mut rng)
            .await
            .unwrap();

        assert_eq!(draft.titles.source, ContentSource::Llm);
        assert_eq!(
            draft.titles.value,
            vec!["Xiamen in 3 days ✨", "Hidden Xiamen 🤫", "Xiamen on a budget 💸"]
        );
        assert_eq!(draft.body.value, "Xiamen stole my heart 💛");
        assert_eq!(draft.tags.value, vec!["Xiamen", "TravelGuide", "Island"]);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].0.contains("Gentle-style titles"));
        assert!(prompts[0].1.contains("(Travel category)"));
        assert!(prompts[2].1.contains("(Travel category)"));
        assert!(prompts[1].0.contains("around 300 words"));
        assert_eq!(prompts[1].2.max_tokens, 800);
        assert_eq!(prompts[2].2.temperature, NOTE_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_sections_fall_back_independently() {
        let model = ScriptedModel::new(vec![None, Some("A model body"), Some("   ")]);
        let mut rng = StdRng::seed_from_u64(1);
        let draft = generate_note(Some(&model), &synth(), &request("Xiamen"), &mut rng)
            .await
            .unwrap();
        assert_eq!(draft.titles.source, ContentSource::Fallback);
        assert_eq!(draft.body.source, ContentSource::Llm);
        assert_eq!(draft.tags.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_overlong_model_titles_are_dropped() {
        let long = "x".repeat(MAX_TITLE_CHARS + 1);
        let model = ScriptedModel::new(vec![Some(long.as_str()), Some("body"), Some("#t")]);
        let mut rng = StdRng::seed_from_u64(1);
        let draft = generate_note(Some(&model), &synth(), &request("Xiamen"), &mut rng)
            .await
            .unwrap();
        assert_eq!(draft.titles.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_empty_topic_rejected_before_any_call() {
        let model = ScriptedModel::new(vec![Some("never")]);
        let mut rng = StdRng::seed_from_u64(1);
        let result = generate_note(Some(&model), &synth(), &request(""), &mut rng).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    fn one_shot(topic: &str) -> NoteRequest {
        NoteRequest {
            mode: NoteMode::OneShot,
            style: "Practical".to_string(),
            ..request(topic)
        }
    }

    #[tokio::test]
    async fn test_one_shot_reply_is_split_into_sections() {
        let model = ScriptedModel::new(vec![Some(
            "## Titles\n1. Xiamen in 3 days ✨\n2. T2\n3. T3\n4. T4\n5. T5\n6. T6\n\n\
             Body line one\n\nBody line two\n\n#a #b #c #d #e #f",
        )]);
        let mut rng = StdRng::seed_from_u64(1);
        let draft = generate_note(Some(&model), &synth(), &one_shot("Xiamen"), &mut rng)
            .await
            .unwrap();

        assert_eq!(draft.titles.source, ContentSource::Llm);
        assert_eq!(
            draft.titles.value,
            vec!["Xiamen in 3 days ✨", "T2", "T3", "T4", "T5"]
        );
        assert_eq!(draft.body.source, ContentSource::Llm);
        assert_eq!(draft.body.value, "Body line one\n\nBody line two");
        assert_eq!(draft.tags.value, vec!["a", "b", "c", "d", "e"]);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.contains("5 eye-catching titles"));
        assert!(prompts[0].1.contains("Style: Practical"));
        assert!(prompts[0].1.contains("Category: Travel"));
        assert_eq!(prompts[0].2.max_tokens, 800);
        assert_eq!(prompts[0].2.temperature, ONE_SHOT_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_one_shot_failure_falls_back_everywhere() {
        let model = ScriptedModel::failing();
        let mut rng = StdRng::seed_from_u64(1);
        let draft = generate_note(Some(&model), &synth(), &one_shot("Xiamen"), &mut rng)
            .await
            .unwrap();
        assert_eq!(draft.titles.source, ContentSource::Fallback);
        assert_eq!(draft.titles.value.len(), 3);
        assert_eq!(draft.body.source, ContentSource::Fallback);
        assert!(draft.body.value.contains("Xiamen"));
        assert_eq!(draft.tags.source, ContentSource::Fallback);
        assert_eq!(draft.tags.value.len(), ONE_SHOT_TAG_COUNT);
    }

    #[tokio::test]
    async fn test_one_shot_fills_missing_parts_from_fallback() {
        let model = ScriptedModel::new(vec![Some("Titles:\nOnly a title\nAnother title")]);
        let mut rng = StdRng::seed_from_u64(1);
        let draft = generate_note(Some(&model), &synth(), &one_shot("Xiamen"), &mut rng)
            .await
            .unwrap();
        assert_eq!(draft.titles.source, ContentSource::Llm);
        assert_eq!(draft.titles.value, vec!["Only a title", "Another title"]);
        assert_eq!(draft.body.source, ContentSource::Fallback);
        assert_eq!(draft.tags.source, ContentSource::Fallback);
    }

    #[test]
    fn test_split_one_shot_skips_headings() {
        let parts = split_one_shot("Title:\nA\n\nBody:\nText here\nTags：\n#x #y");
        assert_eq!(parts.titles, vec!["A"]);
        assert_eq!(parts.body, "Text here");
        assert_eq!(parts.tags, vec!["x", "y"]);
    }
}
