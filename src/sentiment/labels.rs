//! Mapping from a model's native labels onto the canonical vocabulary.
//!
//! Upstream models disagree on label names: SST-2 checkpoints say
//! `POSITIVE`/`NEGATIVE`, multilingual checkpoints say `positive`/`neutral`/
//! `negative`, and checkpoints exported without an `id2label` table only say
//! `LABEL_0`, `LABEL_1`, ... A [`LabelMapping`] resolves a label in this order:
//!
//! 1. an exact (case-insensitive) entry in `aliases`;
//! 2. a class index (`LABEL_<n>` or a bare `<n>`) looked up in the id lists,
//!    unknown indices resolving to neutral;
//! 3. substring match: `pos` → positive, then `neg` → negative;
//! 4. anything else → neutral.
//!
//! The table is versioned so a config file can state which revision of these
//! rules it was written against.

use super::{ModelVariant, Sentiment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Revision of the resolution rules described in the module docs.
pub const LABEL_MAPPING_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMapping {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub positive_ids: Vec<u32>,
    #[serde(default)]
    pub neutral_ids: Vec<u32>,
    #[serde(default)]
    pub negative_ids: Vec<u32>,
    /// Exact label names, compared lower-cased.
    #[serde(default)]
    pub aliases: BTreeMap<String, Sentiment>,
}

fn current_version() -> u32 {
    LABEL_MAPPING_VERSION
}

impl LabelMapping {
    /// SST-2 style checkpoints: 0 = negative, 1 = positive.
    pub fn binary() -> Self {
        Self {
            version: LABEL_MAPPING_VERSION,
            positive_ids: vec![1],
            neutral_ids: vec![],
            negative_ids: vec![0],
            aliases: BTreeMap::new(),
        }
    }

    /// Three-class checkpoints: 0 = negative, 1 = neutral, 2 = positive.
    pub fn three_class() -> Self {
        Self {
            version: LABEL_MAPPING_VERSION,
            positive_ids: vec![2],
            neutral_ids: vec![1],
            negative_ids: vec![0],
            aliases: BTreeMap::new(),
        }
    }

    pub fn for_variant(variant: ModelVariant) -> Self {
        match variant {
            ModelVariant::Binary => Self::binary(),
            ModelVariant::Multilingual => Self::three_class(),
        }
    }

    pub fn with_alias(mut self, label: &str, sentiment: Sentiment) -> Self {
        self.aliases.insert(label.trim().to_lowercase(), sentiment);
        self
    }

    pub fn resolve(&self, label: &str) -> Sentiment {
        let label = label.trim().to_lowercase();

        if let Some(&sentiment) = self.aliases.get(&label) {
            return sentiment;
        }

        if let Some(index) = class_index(&label) {
            return if self.positive_ids.contains(&index) {
                Sentiment::Positive
            } else if self.negative_ids.contains(&index) {
                Sentiment::Negative
            } else {
                Sentiment::Neutral
            };
        }

        if label.contains("pos") {
            Sentiment::Positive
        } else if label.contains("neg") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// `label_2` and `2` both name class index 2.
fn class_index(label: &str) -> Option<u32> {
    let digits = label.strip_prefix("label_").unwrap_or(label);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
