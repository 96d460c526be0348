//! Relevance scoring
//!
//! A cheap additive heuristic: title hits outrank tag hits, which outrank
//! description and body hits. Whole-word matches of longer query words add a
//! small bonus on top.

use regex::{Regex, RegexBuilder};

use crate::search::config::{MIN_WORD_MATCH_LENGTH, ScoreWeights};
use crate::search::types::Searchable;

/// A normalized query with its whole-word patterns compiled once per search
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    normalized: String,
    word_patterns: Vec<Regex>,
}

impl PreparedQuery {
    /// Lower-case and trim the query, then compile a word-boundary pattern for
    /// every whitespace-separated word long enough to earn a bonus
    pub fn new(query: &str) -> Self {
        let normalized = normalize_query(query);
        let word_patterns = normalized
            .split_whitespace()
            .filter(|word| word.chars().count() >= MIN_WORD_MATCH_LENGTH)
            .filter_map(whole_word_pattern)
            .collect();

        Self {
            normalized,
            word_patterns,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Lower-case and trim a raw query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn whole_word_pattern(word: &str) -> Option<Regex> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(word)))
        .case_insensitive(true)
        .build()
        .inspect_err(|e| tracing::trace!("Skipping word bonus for {:?}: {}", word, e))
        .ok()
}

/// Score an item against a prepared query. Returns 0 for an empty query.
pub fn score<T>(item: &T, query: &PreparedQuery, weights: &ScoreWeights) -> u32
where
    T: Searchable + ?Sized,
{
    if query.is_empty() {
        return 0;
    }

    let needle = query.as_str();
    let title = item.title().to_lowercase();
    let description = item.description().to_lowercase();
    let content = item.content().to_lowercase();
    let tags = item.tags().join(" ").to_lowercase();

    let mut score = 0;

    if title.contains(needle) {
        score += weights.title_contains;
        if title.starts_with(needle) {
            score += weights.title_prefix;
        }
    }
    if tags.contains(needle) {
        score += weights.tags_contains;
    }
    if description.contains(needle) {
        score += weights.description_contains;
    }
    if content.contains(needle) {
        score += weights.content_contains;
    }

    for pattern in &query.word_patterns {
        if pattern.is_match(&title) {
            score += weights.title_word;
        }
        if pattern.is_match(&description) {
            score += weights.description_word;
        }
        if pattern.is_match(&tags) {
            score += weights.tags_word;
        }
    }

    score
}

/// Score an item against a raw query string
pub fn relevance_score<T>(item: &T, query: &str, weights: &ScoreWeights) -> u32
where
    T: Searchable + ?Sized,
{
    score(item, &PreparedQuery::new(query), weights)
}
