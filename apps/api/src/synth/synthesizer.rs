//! Synthesizer. Composes template selection, vocabulary draws and slot filling
//! into the artifacts the note and scholar generators fall back to.

use rand::Rng;

use crate::synth::tables::{
    MIN_LITERATURE_ENTRIES, POOL_ABSTRACT, POOL_LITERATURE_REVIEW, POOL_NOTE_BODIES,
    POOL_NOTE_TAGS, POOL_NOTE_TITLES, POOL_RESEARCH_TOPICS,
};
use crate::synth::template::slot_values;
use crate::synth::{
    fill_template, format_citation, pick_random, select_templates, CitationEntry, SlotValues,
    SynthError, TableSet, Template,
};

pub const NOTE_TITLE_COUNT: usize = 3;
pub const NOTE_TAG_COUNT: usize = 10;
pub const RESEARCH_TOPIC_COUNT: usize = 3;

/// Used in the abstract when the topic carries no "<subject>: <method>" split.
const GENERIC_METHOD_NAME: &str = "a novel framework-based";

/// Owns the validated tables for the process lifetime. Shared read-only.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    tables: TableSet,
}

impl Synthesizer {
    pub fn new(tables: TableSet) -> Result<Self, SynthError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    pub fn builtin() -> Result<Self, SynthError> {
        Ok(Self {
            tables: TableSet::builtin()?,
        })
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn select_templates<R: Rng + ?Sized>(
        &self,
        category: &str,
        pool_name: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<&Template>, SynthError> {
        select_templates(&self.tables.pools, category, pool_name, count, rng)
    }

    /// Fills `template`. Slots the caller leaves out are drawn from the
    /// vocabulary of the same name, in slot-name order.
    pub fn fill<R: Rng + ?Sized>(
        &self,
        template: &Template,
        values: &SlotValues,
        rng: &mut R,
    ) -> Result<String, SynthError> {
        let mut values = values.clone();
        for slot in template.slots() {
            if values.contains_key(slot) {
                continue;
            }
            if let Some(vocabulary) = self.tables.vocabularies.get(slot) {
                let word = pick_random(vocabulary, rng)?;
                values.insert(slot.to_string(), word.clone());
            }
        }
        fill_template(template, &values)
    }

    fn render<R: Rng + ?Sized>(
        &self,
        pool_name: &str,
        category: &str,
        count: usize,
        values: &SlotValues,
        rng: &mut R,
    ) -> Result<Vec<String>, SynthError> {
        let templates = self.select_templates(category, pool_name, count, rng)?;
        templates
            .into_iter()
            .map(|t| self.fill(t, values, rng))
            .collect()
    }

    fn render_one<R: Rng + ?Sized>(
        &self,
        pool_name: &str,
        category: &str,
        values: &SlotValues,
        rng: &mut R,
    ) -> Result<String, SynthError> {
        self.render(pool_name, category, 1, values, rng)?
            .into_iter()
            .next()
            .ok_or_else(|| SynthError::MissingDefaultCategory {
                pool: pool_name.to_string(),
            })
    }

    pub fn note_titles<R: Rng + ?Sized>(
        &self,
        scene: &str,
        topic: &str,
        rng: &mut R,
    ) -> Result<Vec<String>, SynthError> {
        let values = slot_values([("topic", topic), ("scene", scene)]);
        self.render(POOL_NOTE_TITLES, scene, NOTE_TITLE_COUNT, &values, rng)
    }

    pub fn note_body<R: Rng + ?Sized>(
        &self,
        style: &str,
        topic: &str,
        rng: &mut R,
    ) -> Result<String, SynthError> {
        let values = slot_values([("topic", topic), ("style", style)]);
        self.render_one(POOL_NOTE_BODIES, style, &values, rng)
    }

    pub fn note_tags<R: Rng + ?Sized>(
        &self,
        scene: &str,
        topic: &str,
        rng: &mut R,
    ) -> Result<Vec<String>, SynthError> {
        let values = slot_values([("topic", topic), ("scene", scene)]);
        self.render(POOL_NOTE_TAGS, scene, NOTE_TAG_COUNT, &values, rng)
    }

    pub fn research_topics<R: Rng + ?Sized>(
        &self,
        field: &str,
        problem: &str,
        rng: &mut R,
    ) -> Result<Vec<String>, SynthError> {
        let values = slot_values([("field", field), ("problem", problem)]);
        self.render(
            POOL_RESEARCH_TOPICS,
            field,
            RESEARCH_TOPIC_COUNT,
            &values,
            rng,
        )
    }

    pub fn literature(&self, field: &str) -> &[CitationEntry] {
        self.tables.literature_for(field)
    }

    pub fn literature_review<R: Rng + ?Sized>(
        &self,
        field: &str,
        problem: &str,
        rng: &mut R,
    ) -> Result<String, SynthError> {
        let literature = self.literature(field);
        let cited = |i: usize| {
            literature
                .get(i)
                .ok_or_else(|| SynthError::InsufficientLiterature {
                    field: field.to_string(),
                    needed: MIN_LITERATURE_ENTRIES,
                    available: literature.len(),
                })
        };
        let (first, second, third) = (cited(0)?, cited(1)?, cited(2)?);

        let values = slot_values([
            ("field", field),
            ("problem", problem),
            ("lit1_label", first.label.as_str()),
            ("lit1_title", first.title.as_str()),
            ("lit2_label", second.label.as_str()),
            ("lit3_label", third.label.as_str()),
        ]);
        self.render_one(POOL_LITERATURE_REVIEW, field, &values, rng)
    }

    /// `topic` is typically the first research topic; its method name is the
    /// text after the last ": ".
    pub fn abstract_draft<R: Rng + ?Sized>(
        &self,
        field: &str,
        problem: &str,
        topic: &str,
        rng: &mut R,
    ) -> Result<String, SynthError> {
        let method_name = topic
            .rsplit_once(": ")
            .map(|(_, method)| method.trim())
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_METHOD_NAME);

        let values = slot_values([
            ("field", field),
            ("problem", problem),
            ("method_name", method_name),
        ]);
        self.render_one(POOL_ABSTRACT, field, &values, rng)
    }

    /// One formatted line per literature entry for `field`.
    pub fn citations(&self, field: &str, style_name: &str) -> Result<Vec<String>, SynthError> {
        self.literature(field)
            .iter()
            .map(|entry| format_citation(entry, style_name))
            .collect()
    }

    /// Registered categories of a pool, for catalog listings.
    pub fn categories(&self, pool_name: &str) -> Vec<String> {
        self.tables
            .pools
            .get(pool_name)
            .map(|p| p.categories().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::DEFAULT_CATEGORY;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn synth() -> Synthesizer {
        Synthesizer::builtin().unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn test_note_titles_use_scene_and_topic() {
        let titles = synth()
            .note_titles("Travel Guide", "Xiamen", &mut rng())
            .unwrap();
        assert_eq!(titles.len(), NOTE_TITLE_COUNT);
        assert!(titles.iter().all(|t| t.contains("Xiamen")));
        assert!(titles.iter().any(|t| t.contains("locals")));
    }

    #[test]
    fn test_unknown_scene_falls_back_to_default_titles() {
        let s = synth();
        let titles = s.note_titles("Knitting", "yarn", &mut rng()).unwrap();
        let defaults = s
            .note_titles("Product Picks", "yarn", &mut rng())
            .unwrap();
        assert_eq!(titles, defaults);
    }

    #[test]
    fn test_note_body_by_style() {
        let body = synth().note_body("Silly", "office snacks", &mut rng()).unwrap();
        assert!(body.contains("office snacks"));
        assert!(body.contains("🤣"));
    }

    #[test]
    fn test_note_tags_are_ten() {
        let tags = synth()
            .note_tags("Career Tips", "time blocking", &mut rng())
            .unwrap();
        assert_eq!(tags.len(), NOTE_TAG_COUNT);
        assert_eq!(tags[0], "CareerTips");
    }

    #[test]
    fn test_research_topics_have_no_leftover_slots() {
        let topics = synth()
            .research_topics("NLP", "hallucination", &mut rng())
            .unwrap();
        assert_eq!(topics.len(), RESEARCH_TOPIC_COUNT);
        for topic in &topics {
            assert!(!topic.contains('{'), "unfilled slot in {topic}");
            assert!(topic.contains("NLP") && topic.contains("hallucination"));
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let s = synth();
        let a = s.research_topics("NLP", "bias", &mut rng()).unwrap();
        let b = s.research_topics("NLP", "bias", &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_caller_values_win_over_vocabulary() {
        let s = synth();
        let t = Template::parse("{method} for {field}").unwrap();
        let out = s
            .fill(&t, &slot_values([("method", "mine"), ("field", "NLP")]), &mut rng())
            .unwrap();
        assert_eq!(out, "mine for NLP");
    }

    #[test]
    fn test_slot_without_value_or_vocabulary_fails() {
        let s = synth();
        let t = Template::parse("{field} study of {problem}").unwrap();
        let err = s
            .fill(&t, &slot_values([("field", "NLP")]), &mut rng())
            .unwrap_err();
        assert!(matches!(err, SynthError::MissingSlot { slot } if slot == "problem"));
    }

    #[test]
    fn test_literature_review_cites_three_works() {
        let field = "Computer Science/Machine Learning/LLM Hallucination Suppression";
        let review = synth()
            .literature_review(field, "hallucination", &mut rng())
            .unwrap();
        assert!(review.contains("Li et al., 2024"));
        assert!(review.contains("Hallucination Suppression in LLMs via Knowledge Grounding"));
        assert!(review.contains("Zhang et al., 2023"));
        assert!(review.contains("Wang et al., 2022"));
        assert!(!review.contains('{'));
    }

    #[test]
    fn test_abstract_uses_method_after_colon() {
        let s = synth();
        let out = s
            .abstract_draft(
                "NLP",
                "bias",
                "Improving the interpretability of bias in NLP: a causal reasoning perspective",
                &mut rng(),
            )
            .unwrap();
        assert!(out.contains("proposes a causal reasoning perspective method"));

        let generic = s.abstract_draft("NLP", "bias", "Plain topic", &mut rng()).unwrap();
        assert!(generic.contains(GENERIC_METHOD_NAME));
    }

    #[test]
    fn test_citations_for_unknown_field_use_default_literature() {
        let lines = synth().citations("Astronomy", "APA 7th").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Author et al. (2024). Research on Core Issues in This Field. Top Journal in the Field."
        );
    }

    #[test]
    fn test_citations_reject_unknown_style() {
        assert!(matches!(
            synth().citations("Astronomy", "Chicago"),
            Err(SynthError::UnknownCitationStyle(_))
        ));
    }

    #[test]
    fn test_categories_lists_scenes() {
        let scenes = synth().categories(POOL_NOTE_TITLES);
        assert!(scenes.contains(&"Travel Guide".to_string()));
        assert!(!scenes.contains(&DEFAULT_CATEGORY.to_string()));
        assert!(synth().categories("nope").is_empty());
    }
}
