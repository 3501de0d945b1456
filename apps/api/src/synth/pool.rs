//! Template pools: category key → ordered templates, with a `default` fallback.

use std::collections::BTreeMap;

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::synth::{SynthError, Template};

/// Category used when a caller's category is not registered.
pub const DEFAULT_CATEGORY: &str = "default";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplatePool {
    categories: BTreeMap<String, Vec<Template>>,
}

impl TemplatePool {
    pub fn new(categories: BTreeMap<String, Vec<Template>>) -> Self {
        Self { categories }
    }

    /// True when the default category exists and is non-empty.
    pub fn has_default(&self) -> bool {
        self.categories
            .get(DEFAULT_CATEGORY)
            .is_some_and(|t| !t.is_empty())
    }

    /// Templates for `category`, or the default category's when it is
    /// unregistered or empty.
    pub fn lookup(&self, category: &str) -> &[Template] {
        self.categories
            .get(category)
            .filter(|t| !t.is_empty())
            .or_else(|| self.categories.get(DEFAULT_CATEGORY))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every template in every category, default included.
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.categories.values().flatten()
    }

    /// Registered category keys, excluding the default.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .keys()
            .map(String::as_str)
            .filter(|k| *k != DEFAULT_CATEGORY)
    }
}

/// Picks up to `count` templates from `pools[pool_name][category]`.
///
/// When the pool holds `count` entries or fewer, all of them are returned in
/// registered order. Otherwise `count` distinct entries are sampled with `rng`.
pub fn select_templates<'a, R>(
    pools: &'a BTreeMap<String, TemplatePool>,
    category: &str,
    pool_name: &str,
    count: usize,
    rng: &mut R,
) -> Result<Vec<&'a Template>, SynthError>
where
    R: Rng + ?Sized,
{
    let pool = pools
        .get(pool_name)
        .ok_or_else(|| SynthError::UnknownPool(pool_name.to_string()))?;
    let entries = pool.lookup(category);

    if entries.len() <= count {
        return Ok(entries.iter().collect());
    }

    Ok(index::sample(rng, entries.len(), count)
        .into_iter()
        .map(|i| &entries[i])
        .collect())
}
