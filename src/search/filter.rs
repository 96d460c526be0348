use std::collections::BTreeSet;

use crate::content::Module;
use crate::search::types::{Candidate, FilterOptions, ModuleOption, SearchFilters, Searchable};

/// Check if a candidate passes the difficulty and tag filters.
///
/// Module and content type are narrowed while flattening, so they are not
/// checked here.
pub fn matches(item: &Candidate<'_>, filters: &SearchFilters) -> bool {
    if let Some(difficulty) = filters.difficulty {
        if item.difficulty() != Some(difficulty) {
            return false;
        }
    }

    if let Some(filter_tags) = filters.tags.as_deref() {
        let filter_tags: Vec<String> = filter_tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();
        if !filter_tags.is_empty() && !any_tag_matches(&filter_tags, item.tags()) {
            return false;
        }
    }

    true
}

/// Any lower-cased filter tag is a substring of any item tag
fn any_tag_matches(filter_tags: &[String], item_tags: &[String]) -> bool {
    let item_tags: Vec<String> = item_tags.iter().map(|tag| tag.to_lowercase()).collect();

    filter_tags
        .iter()
        .any(|filter_tag| item_tags.iter().any(|item_tag| item_tag.contains(filter_tag)))
}

/// Collect the values each filter can take. Difficulties and tags are
/// deduplicated and sorted; modules keep their stored order.
pub fn available_filters(modules: &[Module]) -> FilterOptions {
    let mut difficulties = BTreeSet::new();
    let mut tags = BTreeSet::new();
    let mut module_options = Vec::with_capacity(modules.len());

    for module in modules {
        module_options.push(ModuleOption {
            id: module.id.clone(),
            title: module.title.clone(),
        });

        for section in &module.sections {
            if let Some(difficulty) = section.difficulty {
                difficulties.insert(difficulty.as_str().to_string());
            }
            tags.extend(section.tags.iter().cloned());
        }
    }

    FilterOptions {
        difficulties: difficulties.into_iter().collect(),
        modules: module_options,
        tags: tags.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Difficulty, Exercise, Section};

    fn section(difficulty: Option<Difficulty>, tags: &[&str]) -> Section {
        Section {
            id: "s".to_string(),
            title: "S".to_string(),
            difficulty,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_filters_always_match() {
        let section = section(None, &[]);
        assert!(matches(&Candidate::Section(&section), &SearchFilters::default()));
    }

    #[test]
    fn test_difficulty_is_exact() {
        let advanced = section(Some(Difficulty::Advanced), &[]);
        let unset = section(None, &[]);
        let filters = SearchFilters::default().with_difficulty(Difficulty::Advanced);

        assert!(matches(&Candidate::Section(&advanced), &filters));
        assert!(!matches(&Candidate::Section(&unset), &filters));
        assert!(!matches(
            &Candidate::Section(&advanced),
            &SearchFilters::default().with_difficulty(Difficulty::Beginner)
        ));
    }

    #[test]
    fn test_tags_match_by_substring_any() {
        let section = section(None, &["Reactive-Forms", "rxjs"]);
        let candidate = Candidate::Section(&section);

        assert!(matches(&candidate, &SearchFilters::default().with_tags(["forms"])));
        assert!(matches(&candidate, &SearchFilters::default().with_tags(["http", "RX"])));
        assert!(!matches(&candidate, &SearchFilters::default().with_tags(["routing"])));
        assert!(matches(&candidate, &SearchFilters::default().with_tags(Vec::<String>::new())));
    }

    #[test]
    fn test_blank_tags_are_no_constraint() {
        let untagged = section(None, &[]);
        let candidate = Candidate::Section(&untagged);

        assert!(matches(&candidate, &SearchFilters::default().with_tags([""])));
        assert!(matches(&candidate, &SearchFilters::default().with_tags([" ", ""])));
    }

    #[test]
    fn test_nested_items_use_section_tags_and_difficulty() {
        let section = section(Some(Difficulty::Intermediate), &["pipes"]);
        let exercise = Exercise::default();
        let candidate = Candidate::Exercise {
            section: &section,
            exercise: &exercise,
        };

        let filters = SearchFilters::default()
            .with_difficulty(Difficulty::Intermediate)
            .with_tags(["pipe"]);
        assert!(matches(&candidate, &filters));
    }

    #[test]
    fn test_available_filters_sorted_and_deduplicated() {
        let modules = vec![
            Module {
                id: "zeta".to_string(),
                title: "Zeta".to_string(),
                sections: vec![
                    section(Some(Difficulty::Intermediate), &["rxjs", "forms"]),
                    section(None, &["forms"]),
                ],
                ..Default::default()
            },
            Module {
                id: "alpha".to_string(),
                title: "Alpha".to_string(),
                sections: vec![section(Some(Difficulty::Advanced), &["components"])],
                ..Default::default()
            },
        ];

        let options = available_filters(&modules);
        assert_eq!(options.difficulties, vec!["advanced", "intermediate"]);
        assert_eq!(options.tags, vec!["components", "forms", "rxjs"]);
        assert_eq!(options.modules[0].id, "zeta");
        assert_eq!(options.modules[1].id, "alpha");
    }
}
