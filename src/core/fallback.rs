/// Fallback catalog: curated quotes used when generation is unavailable
/// or its output is rejected.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

use crate::schema::quote::Quote;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Returned for moods the catalog has no entry for.
pub const GENERIC_QUOTE: &str =
    "Every challenge is an opportunity to discover your inner strength.";

const BUILTIN_QUOTES: &[(&str, &[&str])] = &[
    (
        "anxious",
        &[
            "Your anxiety is not your identity. You are brave, you are strong, and this feeling will pass.",
            "Breathe deeply and remember: you have survived 100% of your difficult days so far.",
        ],
    ),
    (
        "tired",
        &[
            "Rest is not a reward for work completed, it's a requirement for work to continue.",
            "Your exhaustion today is building your resilience for tomorrow.",
        ],
    ),
    (
        "unmotivated",
        &[
            "You don't have to be great to get started, but you have to get started to be great.",
            "Getting started takes a spark, but habit is what keeps you going.",
        ],
    ),
    (
        "feeling_down",
        &[
            "Heavy feelings are temporary, but your strength is permanent.",
            "Even the darkest night will end and the sun will rise again.",
        ],
    ),
    (
        "lacking_confidence",
        &[
            "You are braver than you believe, stronger than you seem, and smarter than you think.",
            "Confidence comes not from always being right, but from not fearing to be wrong.",
        ],
    ),
    (
        "stressed",
        &[
            "You can't control everything that happens to you, but you can control how you respond.",
            "Stress is like a wave - you can't stop it from coming, but you can choose how to surf it.",
        ],
    ),
    (
        "need_focus",
        &[
            "Focus is not about doing more things, it's about doing the right things with full attention.",
            "Where attention goes, energy flows and results show.",
        ],
    ),
    (
        "lonely",
        &[
            "The greatest thing in the world is to know how to belong to yourself.",
            "You are never alone when you like the person you're alone with.",
        ],
    ),
];

static BUILTIN: LazyLock<FallbackCatalog> = LazyLock::new(|| {
    let entries = BUILTIN_QUOTES
        .iter()
        .map(|(key, quotes)| {
            (
                key.to_string(),
                quotes.iter().map(|q| q.to_string()).collect(),
            )
        })
        .collect();
    FallbackCatalog { entries }
});

/// Catalog lookup key: lower-case with spaces joined by `_`.
pub fn catalog_key(mood: &str) -> String {
    mood.to_lowercase().replace(' ', "_")
}

/// Mood key → curated quotes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackCatalog {
    pub entries: FxHashMap<String, Vec<String>>,
}

impl FallbackCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> &'static FallbackCatalog {
        &BUILTIN
    }

    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<FallbackCatalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a catalog from a RON map of mood label → quotes.
    ///
    /// Labels are normalized with [`catalog_key`]. Moods with no quotes
    /// are dropped.
    pub fn parse_ron(input: &str) -> Result<FallbackCatalog, CatalogError> {
        let raw: FxHashMap<String, Vec<String>> = ron::from_str(input)?;
        let mut entries = FxHashMap::default();
        for (label, quotes) in raw {
            if quotes.is_empty() {
                tracing::warn!(mood = %label, "dropping catalog entry with no quotes");
                continue;
            }
            entries.insert(catalog_key(&label), quotes);
        }
        Ok(FallbackCatalog { entries })
    }

    /// Merge another catalog into this one. Entries from `other` replace
    /// entries in `self` with the same key.
    pub fn merge(&mut self, other: FallbackCatalog) {
        for (key, quotes) in other.entries {
            self.entries.insert(key, quotes);
        }
    }

    /// Curated quotes for a mood label, if it has any.
    pub fn quotes_for(&self, mood: &str) -> Option<&[String]> {
        self.entries
            .get(&catalog_key(mood))
            .map(Vec::as_slice)
            .filter(|quotes| !quotes.is_empty())
    }

    /// Pick a quote for `mood` uniformly at random from `rng`. Unknown moods
    /// get [`GENERIC_QUOTE`].
    pub fn pick<R: Rng + ?Sized>(&self, mood: &str, rng: &mut R) -> Quote {
        match self.quotes_for(mood).and_then(|quotes| quotes.choose(rng)) {
            Some(quote) => Quote::new(quote.as_str()),
            None => Quote::new(GENERIC_QUOTE),
        }
    }

    /// Sorted catalog keys.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pick a built-in fallback quote using the thread-local RNG.
pub fn get_fallback(mood: &str) -> Quote {
    get_fallback_with(mood, &mut rand::thread_rng())
}

/// Pick a built-in fallback quote using the given RNG.
pub fn get_fallback_with<R: Rng + ?Sized>(mood: &str, rng: &mut R) -> Quote {
    FallbackCatalog::builtin().pick(mood, rng)
}
