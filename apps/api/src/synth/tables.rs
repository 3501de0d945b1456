//! Template, vocabulary and literature tables.
//!
//! `TableSet::builtin()` carries the shipped phrase banks. A JSON file with the
//! same shape can replace them at start-up (`SYNTH_TABLES_PATH`).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::synth::{CitationEntry, SynthError, Template, TemplatePool, DEFAULT_CATEGORY};

pub const POOL_NOTE_TITLES: &str = "note_titles";
pub const POOL_NOTE_BODIES: &str = "note_bodies";
pub const POOL_NOTE_TAGS: &str = "note_tags";
pub const POOL_RESEARCH_TOPICS: &str = "research_topics";
pub const POOL_LITERATURE_REVIEW: &str = "literature_review";
pub const POOL_ABSTRACT: &str = "abstract";

pub const REQUIRED_POOLS: &[&str] = &[
    POOL_NOTE_TITLES,
    POOL_NOTE_BODIES,
    POOL_NOTE_TAGS,
    POOL_RESEARCH_TOPICS,
    POOL_LITERATURE_REVIEW,
    POOL_ABSTRACT,
];

/// Slots the synthesizer fills itself for each pool. Any other slot in a
/// template must name a vocabulary.
pub const CALLER_SLOTS: &[(&str, &[&str])] = &[
    (POOL_NOTE_TITLES, &["topic", "scene"]),
    (POOL_NOTE_BODIES, &["topic", "style"]),
    (POOL_NOTE_TAGS, &["topic", "scene"]),
    (POOL_RESEARCH_TOPICS, &["field", "problem"]),
    (
        POOL_LITERATURE_REVIEW,
        &["field", "problem", "lit1_label", "lit1_title", "lit2_label", "lit3_label"],
    ),
    (POOL_ABSTRACT, &["field", "problem", "method_name"]),
];

/// Every literature field must cite at least this many works (the review outline uses three).
pub const MIN_LITERATURE_ENTRIES: usize = 3;

/// All read-only tables the synthesizer draws from.
///
/// Vocabularies are keyed by the slot name they fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSet {
    pub pools: BTreeMap<String, TemplatePool>,
    pub vocabularies: BTreeMap<String, Vec<String>>,
    pub literature: BTreeMap<String, Vec<CitationEntry>>,
}

impl TableSet {
    /// Checks the invariants generation relies on.
    pub fn validate(&self) -> Result<(), SynthError> {
        for name in REQUIRED_POOLS {
            let pool = self
                .pools
                .get(*name)
                .ok_or_else(|| SynthError::UnknownPool(name.to_string()))?;
            if !pool.has_default() {
                return Err(SynthError::MissingDefaultCategory {
                    pool: name.to_string(),
                });
            }
        }
        for (name, pool) in &self.pools {
            if !pool.has_default() {
                return Err(SynthError::MissingDefaultCategory { pool: name.clone() });
            }
        }

        if let Some((slot, _)) = self.vocabularies.iter().find(|(_, words)| words.is_empty()) {
            return Err(SynthError::EmptyVocabularyTable { slot: slot.clone() });
        }
        for (name, caller_slots) in CALLER_SLOTS {
            let Some(pool) = self.pools.get(*name) else {
                continue;
            };
            for template in pool.templates() {
                let unfillable = template.slots().into_iter().find(|slot| {
                    !caller_slots.contains(slot) && !self.vocabularies.contains_key(*slot)
                });
                if let Some(slot) = unfillable {
                    return Err(SynthError::UnfillableSlot {
                        pool: name.to_string(),
                        template: template.as_str().to_string(),
                        slot: slot.to_string(),
                    });
                }
            }
        }

        if !self.literature.contains_key(DEFAULT_CATEGORY) {
            return Err(SynthError::InsufficientLiterature {
                field: DEFAULT_CATEGORY.to_string(),
                needed: MIN_LITERATURE_ENTRIES,
                available: 0,
            });
        }
        for (field, entries) in &self.literature {
            if entries.len() < MIN_LITERATURE_ENTRIES {
                return Err(SynthError::InsufficientLiterature {
                    field: field.clone(),
                    needed: MIN_LITERATURE_ENTRIES,
                    available: entries.len(),
                });
            }
        }
        Ok(())
    }

    /// Loads and validates tables from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SynthError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SynthError::TableLoad(format!("{}: {e}", path.display())))?;
        let tables: TableSet = serde_json::from_str(&raw)
            .map_err(|e| SynthError::TableLoad(format!("{}: {e}", path.display())))?;
        tables.validate()?;
        info!(
            "Loaded synth tables from {} ({} pools, {} vocabularies, {} literature fields)",
            path.display(),
            tables.pools.len(),
            tables.vocabularies.len(),
            tables.literature.len()
        );
        Ok(tables)
    }

    /// Literature for `field`, falling back to the default field.
    pub fn literature_for(&self, field: &str) -> &[CitationEntry] {
        self.literature
            .get(field.trim())
            .or_else(|| self.literature.get(DEFAULT_CATEGORY))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The shipped tables.
    pub fn builtin() -> Result<Self, SynthError> {
        let mut pools = BTreeMap::new();
        pools.insert(POOL_NOTE_TITLES.to_string(), pool(NOTE_TITLES, Some(PRODUCT_PICKS))?);
        pools.insert(POOL_NOTE_BODIES.to_string(), pool(NOTE_BODIES, Some(BUBBLY))?);
        pools.insert(POOL_NOTE_TAGS.to_string(), pool(NOTE_TAGS, Some(PRODUCT_PICKS))?);
        pools.insert(POOL_RESEARCH_TOPICS.to_string(), pool(RESEARCH_TOPICS, None)?);
        pools.insert(POOL_LITERATURE_REVIEW.to_string(), pool(LITERATURE_REVIEW, None)?);
        pools.insert(POOL_ABSTRACT.to_string(), pool(ABSTRACT, None)?);

        let vocabularies = VOCABULARIES
            .iter()
            .map(|(slot, words)| {
                (
                    slot.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect();

        let literature = LITERATURE
            .iter()
            .map(|(field, rows)| {
                (
                    field.to_string(),
                    rows.iter()
                        .map(|(label, title, venue)| CitationEntry::new(label, title, venue))
                        .collect(),
                )
            })
            .collect();

        let tables = Self {
            pools,
            vocabularies,
            literature,
        };
        tables.validate()?;
        Ok(tables)
    }
}

type RawPool = &'static [(&'static str, &'static [&'static str])];

/// Builds a pool; `default_from` names the category duplicated under `default`.
fn pool(raw: RawPool, default_from: Option<&str>) -> Result<TemplatePool, SynthError> {
    let mut categories = BTreeMap::new();
    for (category, sources) in raw {
        let templates = sources
            .iter()
            .map(|s| Template::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        if default_from == Some(*category) {
            categories.insert(DEFAULT_CATEGORY.to_string(), templates.clone());
        }
        categories.insert(category.to_string(), templates);
    }
    Ok(TemplatePool::new(categories))
}

// ────────────────────────────────────────────────────────────────────────────
// Social notes
// ────────────────────────────────────────────────────────────────────────────

pub const PRODUCT_PICKS: &str = "Product Picks";
pub const BUBBLY: &str = "Bubbly";

const NOTE_TITLES: RawPool = &[
    (
        PRODUCT_PICKS,
        &[
            "Struck gold ✨ {topic} is seriously amazing!",
            "The {topic} I keep rebuying, you'll get it 👍",
            "Budget {topic} that students can grab without a second thought 💸",
        ],
    ),
    (
        "Beauty Tutorial",
        &[
            "Beginner must-learn ✨ {topic} tricks anyone can pull off!",
            "Super easy {topic} tutorial, out the door in 5 minutes 💄",
            "{topic} tips learned the hard way, save this 📝",
        ],
    ),
    (
        "Travel Guide",
        &[
            "{topic} on a 500 budget ✨ the no-regrets guide!",
            "Hidden corners of {topic} even locals don't know 🤫",
            "3 days in {topic}: no detours, no tourist traps 🚗",
        ],
    ),
    (
        "Career Tips",
        &[
            "Every worker needs this ✨ {topic} doubles your output!",
            "From 3k to 10k a month: {topic} saved me two years 💼",
            "Practical {topic} moves even your boss will praise 👍",
        ],
    ),
    (
        "Heartfelt",
        &[
            "Gentle reminder ✨ {topic}: letting go is the best peace",
            "About {topic}, I finally figured it out 💛",
            "To every girl out there: {topic} is life's required course 🌷",
        ],
    ),
];

const NOTE_BODIES: RawPool = &[
    (
        BUBBLY,
        &["Babes! I HAVE to tell you about {topic} 😭! I've used it forever and it honestly works!\n\nThe good stuff 👉\n1. Looks amazing, perfect for photos 📸\n2. Unbeatable value, students can go for it 💸\n3. Better than expected, you'll love it from day one ✨\n\nJust trust me on this one!"],
    ),
    (
        "Cool",
        &["{topic}. No need to please everyone.\n\nKeep what works, swap what doesn't. Life's about being happy 😎\n\nTried plenty of alternatives, this one still fits best. If you know, you know.\n\nNo fluff. Worth it."],
    ),
    (
        "Gentle",
        &["Slowly I realised what {topic} taught me: making peace with life 💛.\n\nNo rush for results, no forcing perfection, a little progress is already good.\n\nMay we all find our own small joys in {topic} ✨."],
    ),
    (
        "Silly",
        &["Who else gets this 🤣! {topic} has me crying with laughter!\n\nI was sure it would flop, then it totally won me over!\n\nI hereby declare {topic} my official source of joy this year, the neighbours came knocking 😂!"],
    ),
    (
        "Expert",
        &["An in-depth review of {topic}, pure substance, no ads 📝!\n\nKey strengths:\n1. Core logic: XXX\n2. Practical steps: XXX\n3. Pitfalls to avoid: XXX\n\nVerdict: great for XX, value ⭐⭐⭐⭐."],
    ),
];

const NOTE_TAGS: RawPool = &[
    (
        PRODUCT_PICKS,
        &[
            "ProductPicks", "BudgetFinds", "StudentEssentials", "RebuyForever", "Unboxing",
            "GreatValue", "EverydayFinds", "HiddenGems", "ShoppingHaul", "PersonalFavourites",
        ],
    ),
    (
        "Beauty Tutorial",
        &[
            "BeautyTutorial", "MakeupForBeginners", "MakeupTips", "AffordableMakeup",
            "BeautyHacks", "EasyMakeup", "MakeupLook", "BaseMakeup", "EyeMakeup", "BeautyShare",
        ],
    ),
    (
        "Travel Guide",
        &[
            "TravelGuide", "HiddenDestinations", "IndependentTravel", "TripPlanning",
            "AvoidTheTraps", "BudgetTravel", "WeekendGetaway", "DomesticTravel", "TravelDiary",
            "PhotoSpots",
        ],
    ),
    (
        "Career Tips",
        &[
            "CareerTips", "Productivity", "NineToFive", "WorkSkills", "PromotionPath",
            "OfficeHacks", "WorkplaceSurvival", "SideHustle", "SelfImprovement", "CareerAdvice",
        ],
    ),
    (
        "Heartfelt",
        &[
            "Heartfelt", "Healing", "WomenGrowth", "SelfAcceptance", "LifeReflections",
            "Positivity", "EmotionalValue", "InnerStrength", "GrowthMindset", "GentleWords",
        ],
    ),
];

// ────────────────────────────────────────────────────────────────────────────
// Scholar
// ────────────────────────────────────────────────────────────────────────────

const RESEARCH_TOPICS: RawPool = &[(
    DEFAULT_CATEGORY,
    &[
        "{method}-based research on {problem} in low-resource {field} settings",
        "Improving the interpretability of {problem} in {field}: a {innovation} perspective",
        "A {cross_field}-informed solution to {problem} in {field} with empirical analysis",
    ],
)];

const LITERATURE_REVIEW: RawPool = &[(
    DEFAULT_CATEGORY,
    &["### Literature review outline: {field} - {problem}\n\
#### 1. Background and significance\n\
{field} has advanced rapidly as a core direction of artificial intelligence, yet {problem} still limits its practical value and calls for effective solutions.\n\n\
#### 2. State of research\n\
##### 2.1 Main families of methods\n\
- Data-augmentation approaches: {lit1_label} proposed \"{lit1_title}\", mitigating {problem} through {approach};\n\
- Architecture-optimisation approaches: {lit2_label} focused on the interpretability of {problem} and introduced a {structure};\n\
- Prompt-engineering approaches: {lit3_label} explored {problem} in low-resource settings, laying groundwork for later studies.\n\n\
#### 3. Gaps in existing work\n\
- Performance drops markedly in {weak_scenario};\n\
- The mechanisms behind {problem} lack in-depth analysis and interpretability checks;\n\
- Cross-disciplinary solutions have not yet been studied systematically.\n\n\
#### 4. Entry point of this work\n\
Addressing these gaps, this study takes a {perspective} perspective and proposes a method for {problem} suited to {field}."],
)];

const ABSTRACT: RawPool = &[(
    DEFAULT_CATEGORY,
    &["### Abstract\n\
**Background**: {field} is a research hotspot in artificial intelligence, and {problem} has become a key bottleneck for deploying it. Existing methods handling {problem} in {challenge} settings suffer from {weakness}.\n\
**Method**: This paper proposes {method_name} method that optimises model output through a {strategy} strategy, strengthening its ability to address {problem}.\n\
**Results**: Experiments on {dataset} show that, compared with the baseline of {baseline}, the proposed method achieves {gain}, validating its effectiveness.\n\
**Conclusion**: The method offers a new way to tackle {problem} in {field} and can be extended to {extension}."],
)];

/// Vocabularies keyed by the slot they fill.
const VOCABULARIES: &[(&str, &[&str])] = &[
    ("method", &["knowledge anchoring", "contrastive learning", "meta-learning", "prompt enhancement", "feature alignment"]),
    ("innovation", &["causal reasoning", "multimodal fusion", "lightweight modelling", "human-AI collaboration"]),
    ("cross_field", &["cognitive psychology", "statistics", "game theory"]),
    ("approach", &["knowledge grounding", "contrastive learning"]),
    ("structure", &["meta-learning framework", "feature alignment strategy"]),
    ("weak_scenario", &["low-resource settings", "complex tasks"]),
    ("perspective", &["multimodal fusion", "lightweight modelling"]),
    ("challenge", &["low-resource", "complex"]),
    ("weakness", &["insufficient performance", "poor interpretability"]),
    ("strategy", &["knowledge anchoring", "feature alignment", "meta-learning"]),
    ("dataset", &["public benchmark datasets", "a purpose-built dataset"]),
    ("baseline", &["Li et al., 2024", "Zhang et al., 2023"]),
    ("gain", &["a 12.5% accuracy improvement", "an 18.3% lower hallucination rate", "a 9.7% higher F1 score"]),
    ("extension", &["multimodal tasks", "industrial-scale applications"]),
];

type RawLiterature = &'static [(&'static str, &'static [(&'static str, &'static str, &'static str)])];

const LITERATURE: RawLiterature = &[
    (
        "Computer Science/Machine Learning/LLM Hallucination Suppression",
        &[
            (
                "Li et al., 2024",
                "Hallucination Suppression in LLMs via Knowledge Grounding",
                "IEEE Transactions on Pattern Analysis and Machine Intelligence",
            ),
            (
                "Zhang et al., 2023",
                "A Survey on Hallucination Detection in Large Language Models",
                "ACM Computing Surveys",
            ),
            (
                "Wang et al., 2022",
                "Contrastive Learning for Reducing LLM Hallucinations",
                "NeurIPS",
            ),
        ],
    ),
    (
        "Computer Science/Machine Learning/Few-Shot Learning",
        &[
            ("Chen et al., 2024", "Few-Shot Learning with Prompt Enhancement", "ICML"),
            ("Liu et al., 2023", "Meta-Learning for Low-Resource Few-Shot Tasks", "ICLR"),
            ("Zhao et al., 2022", "Few-Shot Classification via Feature Alignment", "CVPR"),
        ],
    ),
    (
        DEFAULT_CATEGORY,
        &[
            ("Author et al., 2024", "Research on Core Issues in This Field", "Top Journal in the Field"),
            ("Author et al., 2023", "A Comprehensive Review of Recent Advances", "Key Conference Proceedings"),
            ("Author et al., 2022", "Challenges and Future Directions", "International Journal"),
        ],
    ),
];
