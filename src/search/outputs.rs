//! Output types for search operations
//!
//! These types are printed by the command line front end as JSON documents,
//! and can be deserialized in tests for type-safe validation.

use serde::{Deserialize, Serialize};

use crate::search::types::{FilterOptions, SearchFilters, SearchResult};

/// Output from a search
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchOutput {
    pub query: String,
    #[serde(skip_serializing_if = "SearchFilters::is_empty", default)]
    pub filters: SearchFilters,
    pub total_results: usize,
    pub results: Vec<SearchResult>,
}

impl SearchOutput {
    pub fn new(query: impl Into<String>, filters: SearchFilters, results: Vec<SearchResult>) -> Self {
        Self {
            query: query.into(),
            filters,
            total_results: results.len(),
            results,
        }
    }

    /// Convert to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Output from a suggestion request
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SuggestionsOutput {
    pub partial_query: String,
    pub suggestions: Vec<String>,
}

impl SuggestionsOutput {
    /// Convert to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Output listing the available filter values
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FiltersOutput {
    #[serde(flatten)]
    pub options: FilterOptions,
}

impl FiltersOutput {
    /// Convert to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Error output
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorOutput {
    pub error: String,
}

impl ErrorOutput {
    /// Create a new error output
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Convert to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize error"}"#.to_string())
    }
}
