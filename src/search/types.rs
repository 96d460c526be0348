use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::content::{CodeExample, Difficulty, Exercise, Section};
use crate::util::{
    deserialize_content_type_lenient, deserialize_difficulty_lenient, deserialize_lenient_default,
};

/// Kind of searchable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Section,
    CodeExample,
    Exercise,
}

impl ContentType {
    /// Convert content type to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Section => "section",
            ContentType::CodeExample => "code-example",
            ContentType::Exercise => "exercise",
        }
    }

    /// Parse a content type; accepts `code_example` as an alias
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "section" => Some(ContentType::Section),
            "code-example" | "code_example" => Some(ContentType::CodeExample),
            "exercise" => Some(ContentType::Exercise),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial filter set. Absent or blank fields impose no constraint, and
/// unknown keys or unreadable values are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(
        default,
        deserialize_with = "deserialize_difficulty_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<Difficulty>,
    #[serde(
        default,
        alias = "moduleId",
        deserialize_with = "deserialize_lenient_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub module_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        alias = "contentType",
        deserialize_with = "deserialize_content_type_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<ContentType>,
}

impl SearchFilters {
    /// True when no field is set. A set-but-empty tag list still counts as set.
    pub fn is_empty(&self) -> bool {
        self.difficulty.is_none()
            && self.module_id.is_none()
            && self.tags.is_none()
            && self.content_type.is_none()
    }

    /// Module constraint, if any. A blank module ID constrains nothing.
    pub fn module_constraint(&self) -> Option<&str> {
        self.module_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Apply an update key by key: keys present in the update overwrite
    /// this set, cleared keys are removed, absent keys are kept
    pub fn merge(&mut self, update: impl Into<FilterUpdate>) {
        let update = update.into();

        if let Some(difficulty) = update.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(module_id) = update.module_id {
            self.module_id = module_id.filter(|id| !id.trim().is_empty());
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(content_type) = update.content_type {
            self.content_type = content_type;
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_module(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = Some(module_id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }
}

/// A change to the filter set.
///
/// The outer `Option` says whether the key is written at all, the inner one
/// holds the new value. When deserializing, a key that is present but empty,
/// `null` or unreadable clears that filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterUpdate {
    #[serde(default, deserialize_with = "present_difficulty")]
    pub difficulty: Option<Option<Difficulty>>,
    #[serde(default, alias = "moduleId", deserialize_with = "present_lenient")]
    pub module_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_lenient")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, alias = "contentType", deserialize_with = "present_content_type")]
    pub content_type: Option<Option<ContentType>>,
}

impl FilterUpdate {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(Some(difficulty));
        self
    }

    pub fn clear_difficulty(mut self) -> Self {
        self.difficulty = Some(None);
        self
    }

    pub fn with_module(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = Some(Some(module_id.into()));
        self
    }

    pub fn clear_module(mut self) -> Self {
        self.module_id = Some(None);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(Some(tags.into_iter().map(Into::into).collect()));
        self
    }

    pub fn clear_tags(mut self) -> Self {
        self.tags = Some(None);
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(Some(content_type));
        self
    }

    pub fn clear_content_type(mut self) -> Self {
        self.content_type = Some(None);
        self
    }
}

/// Every set field of a filter set becomes a write; unset fields are left alone
impl From<SearchFilters> for FilterUpdate {
    fn from(filters: SearchFilters) -> Self {
        Self {
            difficulty: filters.difficulty.map(Some),
            module_id: filters.module_id.map(Some),
            tags: filters.tags.map(Some),
            content_type: filters.content_type.map(Some),
        }
    }
}

fn present_difficulty<'de, D>(deserializer: D) -> Result<Option<Option<Difficulty>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_difficulty_lenient(deserializer).map(Some)
}

fn present_content_type<'de, D>(deserializer: D) -> Result<Option<Option<ContentType>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_content_type_lenient(deserializer).map(Some)
}

fn present_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    deserialize_lenient_default(deserializer).map(Some)
}

/// A ranked search hit. Recomputed on every search, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Section ID, or `{section_id}-{child_id}` for nested items
    pub id: String,
    pub module_id: String,
    /// Section title, or `{section_title} - {child_title}` for nested items
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    /// Excerpt with `<mark>` highlighting
    pub snippet: String,
    pub relevance_score: u32,
}

/// Module entry in the filter options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOption {
    pub id: String,
    pub title: String,
}

/// Values available for each filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub difficulties: Vec<String>,
    pub modules: Vec<ModuleOption>,
    pub tags: Vec<String>,
}

/// Fields the relevance scorer reads from an item
pub trait Searchable {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn content(&self) -> &str;
    fn tags(&self) -> &[String];
}

/// One searchable unit considered during a search. Nested items borrow the
/// parent section for its tags and difficulty.
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    Section(&'a Section),
    CodeExample {
        section: &'a Section,
        example: &'a CodeExample,
    },
    Exercise {
        section: &'a Section,
        exercise: &'a Exercise,
    },
}

impl<'a> Candidate<'a> {
    /// Get the kind of this candidate
    pub fn kind(&self) -> ContentType {
        match self {
            Candidate::Section(_) => ContentType::Section,
            Candidate::CodeExample { .. } => ContentType::CodeExample,
            Candidate::Exercise { .. } => ContentType::Exercise,
        }
    }

    /// Get the section this candidate belongs to
    pub fn section(&self) -> &'a Section {
        match *self {
            Candidate::Section(section) => section,
            Candidate::CodeExample { section, .. } => section,
            Candidate::Exercise { section, .. } => section,
        }
    }

    /// Difficulty used for filtering
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.section().difficulty
    }

    /// Identifier used in results
    pub fn result_id(&self) -> String {
        match self {
            Candidate::Section(section) => section.id.clone(),
            Candidate::CodeExample { section, example } => format!("{}-{}", section.id, example.id),
            Candidate::Exercise { section, exercise } => format!("{}-{}", section.id, exercise.id),
        }
    }

    /// Title used in results
    pub fn result_title(&self) -> String {
        match self {
            Candidate::Section(section) => section.title.clone(),
            Candidate::CodeExample { section, example } => {
                format!("{} - {}", section.title, example.title)
            }
            Candidate::Exercise { section, exercise } => {
                format!("{} - {}", section.title, exercise.title)
            }
        }
    }

    /// Text shown as the result body
    pub fn result_content(&self) -> &'a str {
        match *self {
            Candidate::Section(section) => &section.content,
            Candidate::CodeExample { example, .. } => &example.description,
            Candidate::Exercise { exercise, .. } => &exercise.description,
        }
    }

    /// Text the snippet is cut from. Code examples without a description
    /// fall back to their code.
    pub fn snippet_source(&self) -> &'a str {
        match *self {
            Candidate::Section(section) => &section.content,
            Candidate::CodeExample { example, .. } if example.description.is_empty() => {
                example.code.as_deref().unwrap_or_default()
            }
            Candidate::CodeExample { example, .. } => &example.description,
            Candidate::Exercise { exercise, .. } => &exercise.description,
        }
    }
}

impl Searchable for Candidate<'_> {
    fn title(&self) -> &str {
        match self {
            Candidate::Section(section) => &section.title,
            Candidate::CodeExample { example, .. } => &example.title,
            Candidate::Exercise { exercise, .. } => &exercise.title,
        }
    }

    fn description(&self) -> &str {
        match self {
            Candidate::Section(_) => "",
            Candidate::CodeExample { example, .. } => &example.description,
            Candidate::Exercise { exercise, .. } => &exercise.description,
        }
    }

    fn content(&self) -> &str {
        match self {
            Candidate::Section(section) => &section.content,
            Candidate::CodeExample { example, .. } => example.code.as_deref().unwrap_or_default(),
            Candidate::Exercise { exercise, .. } => exercise.solution.as_deref().unwrap_or_default(),
        }
    }

    fn tags(&self) -> &[String] {
        &self.section().tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_merge_is_last_write_wins_per_key() {
        let mut filters = SearchFilters::default()
            .with_difficulty(Difficulty::Beginner)
            .with_tags(["forms"]);

        filters.merge(
            SearchFilters::default()
                .with_difficulty(Difficulty::Advanced)
                .with_module("routing"),
        );

        assert_eq!(filters.difficulty, Some(Difficulty::Advanced));
        assert_eq!(filters.module_id.as_deref(), Some("routing"));
        assert_eq!(filters.tags, Some(vec!["forms".to_string()]));
        assert_eq!(filters.content_type, None);
    }

    #[test]
    fn test_filters_emptiness_counts_keys() {
        assert!(SearchFilters::default().is_empty());
        assert!(!SearchFilters::default().with_tags(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_filters_ignore_unknown_keys() {
        let filters: SearchFilters =
            serde_json::from_str(r#"{"difficulty":"advanced","color":"blue","contentType":"exercise"}"#)
                .unwrap();
        assert_eq!(filters.difficulty, Some(Difficulty::Advanced));
        assert_eq!(filters.content_type, Some(ContentType::Exercise));
    }

    #[test]
    fn test_empty_write_clears_one_key() {
        let mut filters = SearchFilters::default()
            .with_difficulty(Difficulty::Advanced)
            .with_tags(["forms"]);

        let update: FilterUpdate = serde_json::from_str(r#"{"difficulty":""}"#).unwrap();
        filters.merge(update);

        assert_eq!(filters.difficulty, None);
        assert_eq!(filters.tags, Some(vec!["forms".to_string()]));
    }

    #[test]
    fn test_absent_keys_are_kept_and_blank_module_clears() {
        let mut filters = SearchFilters::default()
            .with_difficulty(Difficulty::Beginner)
            .with_module("routing");

        let update: FilterUpdate =
            serde_json::from_str(r#"{"moduleId":"","contentType":"exercise"}"#).unwrap();
        filters.merge(update);

        assert_eq!(filters.difficulty, Some(Difficulty::Beginner));
        assert_eq!(filters.module_id, None);
        assert_eq!(filters.content_type, Some(ContentType::Exercise));

        filters.merge(FilterUpdate::default().clear_difficulty().with_tags(["rxjs"]));
        assert_eq!(filters.difficulty, None);
        assert_eq!(filters.tags, Some(vec!["rxjs".to_string()]));
    }

    #[test]
    fn test_unreadable_filter_values_are_tolerated() {
        let filters: SearchFilters =
            serde_json::from_str(r#"{"contentType":"","moduleId":7,"tags":"forms"}"#).unwrap();
        assert!(filters.is_empty());

        let filters: SearchFilters = serde_json::from_str(r#"{"contentType":"video"}"#).unwrap();
        assert_eq!(filters.content_type, None);

        let update: FilterUpdate =
            serde_json::from_str(r#"{"contentType":{"kind":"exercise"}}"#).unwrap();
        assert_eq!(update.content_type, Some(None));
    }

    #[test]
    fn test_blank_module_is_no_constraint() {
        assert_eq!(SearchFilters::default().with_module("").module_constraint(), None);
        assert_eq!(SearchFilters::default().with_module("  ").module_constraint(), None);
        assert_eq!(
            SearchFilters::default().with_module("core").module_constraint(),
            Some("core")
        );
    }

    #[test]
    fn test_nested_candidate_composes_id_and_title() {
        let section = Section {
            id: "templates".to_string(),
            title: "Templates".to_string(),
            tags: vec!["binding".to_string()],
            ..Default::default()
        };
        let example = CodeExample {
            id: "interpolation".to_string(),
            title: "Interpolation".to_string(),
            code: Some("{{ value }}".to_string()),
            ..Default::default()
        };
        let candidate = Candidate::CodeExample {
            section: &section,
            example: &example,
        };

        assert_eq!(candidate.result_id(), "templates-interpolation");
        assert_eq!(candidate.result_title(), "Templates - Interpolation");
        assert_eq!(candidate.tags(), &["binding".to_string()]);
        assert_eq!(candidate.snippet_source(), "{{ value }}");
        assert_eq!(candidate.kind().as_str(), "code-example");
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!(ContentType::parse("code_example"), Some(ContentType::CodeExample));
        assert_eq!(ContentType::parse("Exercise"), Some(ContentType::Exercise));
        assert_eq!(ContentType::parse("module"), None);
    }
}
