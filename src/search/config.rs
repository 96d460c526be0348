//! # Search Configuration Module
//!
//! Provides configuration constants and the tunable [`SearchConfig`].
//!
//! The scoring weights are hand-tuned and can be overridden from a TOML
//! file without touching the scorer.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default limit for search results
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Quiet period after the last query change before a search runs
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default snippet length for the fallback excerpt, in characters
pub const DEFAULT_SNIPPET_LENGTH: usize = 150;

/// Characters kept on each side of a match in a snippet
pub const SNIPPET_CONTEXT_CHARS: usize = 50;

/// Marker for truncated snippet text
pub const ELLIPSIS: &str = "...";

/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 10;

/// Partial queries shorter than this produce no suggestions
pub const MIN_SUGGESTION_QUERY_LENGTH: usize = 2;

/// Query words shorter than this never earn whole-word bonuses
pub const MIN_WORD_MATCH_LENGTH: usize = 3;

/// Capacity of the searching-state broadcast channel
pub const SEARCHING_EVENTS_CAPACITY: usize = 64;

/// Points awarded by the relevance scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub title_contains: u32,
    pub title_prefix: u32,
    pub tags_contains: u32,
    pub description_contains: u32,
    pub content_contains: u32,
    pub title_word: u32,
    pub description_word: u32,
    pub tags_word: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title_contains: 10,
            title_prefix: 5,
            tags_contains: 8,
            description_contains: 5,
            content_contains: 2,
            title_word: 3,
            description_word: 2,
            tags_word: 2,
        }
    }
}

/// Tunable search behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    pub debounce_ms: u64,
    pub snippet_length: usize,
    pub max_suggestions: usize,
    pub weights: ScoreWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_SEARCH_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            max_suggestions: MAX_SUGGESTIONS,
            weights: ScoreWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: SearchConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            "Loaded search config from {} (limit {}, debounce {}ms)",
            path.display(),
            config.max_results,
            config.debounce_ms
        );
        Ok(config)
    }

    /// Get the debounce delay as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
