//! Learning content data model
//!
//! These types mirror the JSON documents produced by the content pipeline
//! (`modules.json` and per-section files). Every field is defaulted so a
//! single malformed entry degrades to empty values instead of failing the
//! whole document.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::util::{
    deserialize_difficulty_lenient, deserialize_lenient_default, deserialize_lenient_vec,
};

/// Difficulty level of a learning section
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Convert difficulty to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Parse a difficulty level, ignoring case and surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level grouping of learning sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Module {
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub icon: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub order: u32,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub description: String,
    #[serde(deserialize_with = "deserialize_lenient_vec")]
    pub sections: Vec<Section>,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub is_available: bool,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub estimated_time: String,
}

/// A single learning unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub module_id: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub title: String,
    /// Main content in markdown format
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub content: String,
    #[serde(
        deserialize_with = "deserialize_difficulty_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<Difficulty>,
    #[serde(deserialize_with = "deserialize_lenient_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "deserialize_lenient_vec")]
    pub code_examples: Vec<CodeExample>,
    #[serde(deserialize_with = "deserialize_lenient_vec")]
    pub exercises: Vec<Exercise>,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub order: u32,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub estimated_time: String,
}

impl Section {
    /// Difficulty shown to learners; sections without one count as beginner
    pub fn effective_difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }
}

/// An interactive code example within a section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeExample {
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub description: String,
    #[serde(
        deserialize_with = "deserialize_lenient_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub language: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub is_editable: bool,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub explanation: String,
    #[serde(
        deserialize_with = "deserialize_lenient_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_output: Option<String>,
}

/// A practice exercise within a section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Exercise {
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_lenient_default")]
    pub description: String,
    #[serde(
        deserialize_with = "deserialize_lenient_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub solution: Option<String>,
}
