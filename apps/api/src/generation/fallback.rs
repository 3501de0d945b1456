//! Model-first generation with synthesizer fallback, plus the parsers that turn
//! free-form model output into lists.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::{CompletionOptions, LanguageModel};
use crate::synth::SynthError;

/// Where a generated section came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Llm,
    Fallback,
}

/// One generated section and its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section<T> {
    pub value: T,
    pub source: ContentSource,
}

/// A prompt ready to send: system + user text and sampling options.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub system: String,
    pub user: String,
    pub options: CompletionOptions,
}

/// Asks the model for `section`; if there is no model, the call fails, or
/// `parse` yields nothing usable, `fallback` produces the section instead.
pub async fn complete_or_fallback<T, P, F>(
    llm: Option<&dyn LanguageModel>,
    section: &str,
    prompt: &PromptSpec,
    parse: P,
    fallback: F,
) -> Result<Section<T>, SynthError>
where
    P: FnOnce(&str) -> Option<T>,
    F: FnOnce() -> Result<T, SynthError>,
{
    let value = match llm {
        Some(llm) => match llm
            .complete(&prompt.system, &prompt.user, &prompt.options)
            .await
        {
            Ok(text) => {
                let value = parse(&text);
                match value {
                    Some(_) => info!("Generated {section} with {}", llm.model()),
                    None => warn!("{section}: model output unusable, using fallback templates"),
                }
                value
            }
            Err(e) => {
                warn!("{section} generation failed, using fallback templates: {e}");
                None
            }
        },
        None => None,
    };

    model_or_fallback(value, fallback)
}

/// Wraps an already-parsed model value, or runs `fallback` when there is none.
pub fn model_or_fallback<T, F>(value: Option<T>, fallback: F) -> Result<Section<T>, SynthError>
where
    F: FnOnce() -> Result<T, SynthError>,
{
    match value {
        Some(value) => Ok(Section {
            value,
            source: ContentSource::Llm,
        }),
        None => Ok(Section {
            value: fallback()?,
            source: ContentSource::Fallback,
        }),
    }
}

/// Non-empty lines with list markers ("1. ", "2) ", "3、", "- ", "* ", "• ") stripped.
pub fn parse_lines(text: &str, max: usize) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|l| !l.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Hashtags from whitespace-separated tokens, `#` removed, duplicates dropped.
pub fn parse_tags(text: &str, max: usize) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let tag = token.trim_matches(|c: char| c == '#' || c == ',' || c == '，');
        if tag.is_empty() || tags.iter().any(|t| t == tag) {
            continue;
        }
        tags.push(tag.to_string());
        if tags.len() == max {
            break;
        }
    }
    tags
}

/// Some(value) when non-empty, for use as a `parse` result.
pub fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    let rest = if digits > 0 {
        let after = &line[digits..];
        match after.strip_prefix('、') {
            Some(rest) => rest,
            // "1.5x" is a number, not a marker
            None => after
                .strip_prefix('.')
                .or_else(|| after.strip_prefix(')'))
                .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
                .unwrap_or(line),
        }
    } else {
        line.strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
            .or_else(|| line.strip_prefix("• "))
            .unwrap_or(line)
    };
    rest.trim()
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedModel;
    use super::*;

    fn prompt() -> PromptSpec {
        PromptSpec {
            system: "sys".to_string(),
            user: "user".to_string(),
            options: CompletionOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_no_model_uses_fallback() {
        let section = complete_or_fallback(
            None,
            "titles",
            &prompt(),
            |t| Some(t.to_string()),
            || Ok("fallback".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(section.value, "fallback");
        assert_eq!(section.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_model_reply_is_used() {
        let model = ScriptedModel::new(vec![Some("from model")]);
        let section = complete_or_fallback(
            Some(&model),
            "body",
            &prompt(),
            |t| Some(t.to_string()),
            || Ok("fallback".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(section.value, "from model");
        assert_eq!(section.source, ContentSource::Llm);
        assert_eq!(model.prompts.lock().unwrap()[0].1, "user");
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let model = ScriptedModel::failing();
        let section = complete_or_fallback(
            Some(&model),
            "body",
            &prompt(),
            |t| Some(t.to_string()),
            || Ok("fallback".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(section.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_unusable_reply_falls_back() {
        let model = ScriptedModel::new(vec![Some("\n\n")]);
        let section = complete_or_fallback(
            Some(&model),
            "titles",
            &prompt(),
            |t| non_empty(parse_lines(t, 3)),
            || Ok(vec!["fallback".to_string()]),
        )
        .await
        .unwrap();
        assert_eq!(section.value, vec!["fallback".to_string()]);
        assert_eq!(section.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_fallback_errors_propagate() {
        let result: Result<Section<String>, _> = complete_or_fallback(
            None,
            "body",
            &prompt(),
            |t| Some(t.to_string()),
            || Err(SynthError::EmptyVocabulary),
        )
        .await;
        assert!(matches!(result, Err(SynthError::EmptyVocabulary)));
    }

    #[test]
    fn test_model_or_fallback_prefers_model_value() {
        let section = model_or_fallback(Some(1), || Ok(2)).unwrap();
        assert_eq!(section.value, 1);
        assert_eq!(section.source, ContentSource::Llm);

        let section = model_or_fallback(None, || Ok(2)).unwrap();
        assert_eq!(section.value, 2);
        assert_eq!(section.source, ContentSource::Fallback);
    }

    #[test]
    fn test_parse_lines_strips_markers() {
        let text = "1. First idea\n\n2) Second idea\n- Third idea\n4. Fourth";
        assert_eq!(
            parse_lines(text, 3),
            vec!["First idea", "Second idea", "Third idea"]
        );
    }

    #[test]
    fn test_parse_lines_keeps_leading_numbers_without_marker() {
        assert_eq!(parse_lines("3 days in Xiamen", 3), vec!["3 days in Xiamen"]);
    }

    #[test]
    fn test_parse_lines_keeps_decimal_numbers() {
        assert_eq!(
            parse_lines("1.5x faster skincare\n2. 3.5 hours in Xiamen\n3、Budget picks", 3),
            vec!["1.5x faster skincare", "3.5 hours in Xiamen", "Budget picks"]
        );
    }

    #[test]
    fn test_parse_tags() {
        let text = "#TravelGuide #Xiamen #TravelGuide  #BudgetTravel,\n#";
        assert_eq!(
            parse_tags(text, 10),
            vec!["TravelGuide", "Xiamen", "BudgetTravel"]
        );
        assert_eq!(parse_tags("#a #b #c", 2), vec!["a", "b"]);
    }
}
