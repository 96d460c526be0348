use crate::content::Module;
use crate::search::config::SearchConfig;
use crate::search::filter;
use crate::search::scorer::{self, PreparedQuery};
use crate::search::snippet::generate_snippet;
use crate::search::types::{Candidate, SearchFilters, SearchResult};

/// A search with a blank query and no filters never runs
pub fn is_blank_search(query: &str, filters: &SearchFilters) -> bool {
    query.trim().is_empty() && filters.is_empty()
}

/// Flatten modules into candidates in stored order: each section, then its
/// code examples, then its exercises. Module and content type filters are
/// applied here.
pub fn candidates<'a>(
    modules: &'a [Module],
    filters: &'a SearchFilters,
) -> impl Iterator<Item = (&'a Module, Candidate<'a>)> + 'a {
    modules
        .iter()
        .filter(move |module| {
            filters
                .module_constraint()
                .is_none_or(|module_id| module.id == module_id)
        })
        .flat_map(|module| {
            module.sections.iter().flat_map(move |section| {
                std::iter::once(Candidate::Section(section))
                    .chain(
                        section
                            .code_examples
                            .iter()
                            .map(move |example| Candidate::CodeExample { section, example }),
                    )
                    .chain(
                        section
                            .exercises
                            .iter()
                            .map(move |exercise| Candidate::Exercise { section, exercise }),
                    )
                    .map(move |candidate| (module, candidate))
            })
        })
        .filter(move |(_, candidate)| {
            filters
                .content_type
                .is_none_or(|content_type| candidate.kind() == content_type)
        })
}

/// Run a search over the given modules.
///
/// Results with a zero score are dropped even when they pass every filter.
/// The sort is stable, so ties keep their flattening order.
pub fn execute(
    query: &str,
    filters: &SearchFilters,
    modules: &[Module],
    config: &SearchConfig,
) -> Vec<SearchResult> {
    if is_blank_search(query, filters) {
        return Vec::new();
    }

    let prepared = PreparedQuery::new(query);
    let mut considered = 0usize;
    let mut results = Vec::new();

    for (module, candidate) in candidates(modules, filters) {
        considered += 1;
        if !filter::matches(&candidate, filters) {
            continue;
        }

        let relevance = scorer::score(&candidate, &prepared, &config.weights);
        if relevance == 0 {
            continue;
        }

        results.push(SearchResult {
            id: candidate.result_id(),
            module_id: module.id.clone(),
            title: candidate.result_title(),
            content: candidate.result_content().to_string(),
            kind: candidate.kind(),
            difficulty: candidate.section().effective_difficulty(),
            tags: candidate.section().tags.clone(),
            snippet: generate_snippet(
                candidate.snippet_source(),
                prepared.as_str(),
                config.snippet_length,
            ),
            relevance_score: relevance,
        });
    }

    let matched = results.len();
    results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    results.truncate(config.max_results);

    tracing::debug!(
        "Search {:?}: {} candidates, {} matched, {} returned",
        prepared.as_str(),
        considered,
        matched,
        results.len()
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CodeExample, Difficulty, Exercise, Section};
    use crate::search::config::DEFAULT_SEARCH_LIMIT;
    use crate::search::types::ContentType;

    fn section(id: &str, title: &str, difficulty: Difficulty, tags: &[&str]) -> Section {
        Section {
            id: id.to_string(),
            module_id: "core".to_string(),
            title: title.to_string(),
            content: format!("This section covers {}.", title.to_lowercase()),
            difficulty: Some(difficulty),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn fixture() -> Vec<Module> {
        let mut components = section(
            "components",
            "Introduction to Components",
            Difficulty::Beginner,
            &["components", "basics"],
        );
        components.code_examples.push(CodeExample {
            id: "hello".to_string(),
            title: "Hello component".to_string(),
            description: "A minimal component".to_string(),
            code: Some("@Component({ selector: 'app-hello' })".to_string()),
            ..Default::default()
        });
        components.exercises.push(Exercise {
            id: "counter".to_string(),
            title: "Build a counter".to_string(),
            description: "Write a counter component with two buttons".to_string(),
            solution: None,
        });

        let signals = section("signals", "Signals", Difficulty::Advanced, &["reactivity"]);

        vec![
            Module {
                id: "core".to_string(),
                title: "Core Concepts".to_string(),
                sections: vec![components, signals],
                ..Default::default()
            },
            Module {
                id: "routing".to_string(),
                title: "Routing".to_string(),
                sections: vec![section(
                    "guards",
                    "Route guards",
                    Difficulty::Intermediate,
                    &["routing", "components"],
                )],
                ..Default::default()
            },
        ]
    }

    fn run(query: &str, filters: &SearchFilters) -> Vec<SearchResult> {
        execute(query, filters, &fixture(), &SearchConfig::default())
    }

    #[test]
    fn test_empty_query_without_filters_returns_nothing() {
        assert!(run("", &SearchFilters::default()).is_empty());
        assert!(run("   ", &SearchFilters::default()).is_empty());
    }

    #[test]
    fn test_filters_alone_return_nothing() {
        let filters = SearchFilters::default().with_difficulty(Difficulty::Advanced);
        assert!(run("", &filters).is_empty());
    }

    #[test]
    fn test_unknown_query_returns_nothing() {
        assert!(run("xyznotfound", &SearchFilters::default()).is_empty());
    }

    #[test]
    fn test_component_query_finds_section() {
        let results = run("component", &SearchFilters::default());

        let section = results
            .iter()
            .find(|r| r.id == "components")
            .expect("section should match");
        assert!(section.relevance_score >= 10);
        assert_eq!(section.kind, ContentType::Section);
        assert_eq!(section.module_id, "core");
    }

    #[test]
    fn test_nested_results_compose_ids_and_titles() {
        let results = run("counter", &SearchFilters::default());

        assert_eq!(results.len(), 1);
        let exercise = &results[0];
        assert_eq!(exercise.id, "components-counter");
        assert_eq!(exercise.title, "Introduction to Components - Build a counter");
        assert_eq!(exercise.kind, ContentType::Exercise);
        assert_eq!(exercise.difficulty, Difficulty::Beginner);
        assert_eq!(exercise.content, "Write a counter component with two buttons");
        assert!(exercise.snippet.contains("<mark>counter</mark>"));
    }

    #[test]
    fn test_results_sorted_descending() {
        let results = run("component", &SearchFilters::default());

        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["components-hello", "components", "components-counter", "guards"]);
        for pair in results.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
    }

    #[test]
    fn test_ties_keep_flattening_order() {
        let modules = vec![Module {
            id: "m".to_string(),
            sections: vec![
                section("c", "Zoneless one", Difficulty::Beginner, &[]),
                section("a", "Zoneless two", Difficulty::Beginner, &[]),
                section("b", "Zoneless three", Difficulty::Beginner, &[]),
            ],
            ..Default::default()
        }];

        let results = execute("zoneless", &SearchFilters::default(), &modules, &SearchConfig::default());
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_prefix_match_ranks_strictly_higher() {
        let modules = vec![Module {
            id: "m".to_string(),
            sections: vec![
                section("a", "Advanced pipes", Difficulty::Beginner, &[]),
                section("b", "Pipes overview", Difficulty::Beginner, &[]),
            ],
            ..Default::default()
        }];

        let results = execute("pipes", &SearchFilters::default(), &modules, &SearchConfig::default());
        assert_eq!(results[0].id, "b");
        assert!(results[0].relevance_score > results[1].relevance_score);
    }

    #[test]
    fn test_difficulty_filter_applies_to_nested_items() {
        let filters = SearchFilters::default().with_difficulty(Difficulty::Intermediate);
        let results = run("component", &filters);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "guards");
    }

    #[test]
    fn test_module_and_content_type_filters() {
        let filters = SearchFilters::default().with_module("routing");
        let results = run("component", &filters);
        assert!(results.iter().all(|r| r.module_id == "routing"));
        assert!(!results.is_empty());

        let filters = SearchFilters::default().with_content_type(ContentType::CodeExample);
        let results = run("component", &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "components-hello");
    }

    #[test]
    fn test_blank_module_filter_is_no_constraint() {
        let unfiltered = run("signals", &SearchFilters::default());
        assert_eq!(unfiltered.len(), 1);

        for blank in ["", "   "] {
            let results = run("signals", &SearchFilters::default().with_module(blank));
            assert_eq!(results, unfiltered, "module filter {blank:?}");
        }
    }

    #[test]
    fn test_tag_filter_narrows_but_does_not_score() {
        let filters = SearchFilters::default().with_tags(["reactiv"]);
        assert!(run("component", &filters).is_empty());

        let results = run("signals", &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "signals");
    }

    #[test]
    fn test_results_are_capped() {
        let sections = (0..120)
            .map(|i| section(&format!("s{i}"), &format!("Forms {i}"), Difficulty::Beginner, &[]))
            .collect();
        let modules = vec![Module {
            id: "forms".to_string(),
            sections,
            ..Default::default()
        }];

        let results = execute("forms", &SearchFilters::default(), &modules, &SearchConfig::default());
        assert_eq!(results.len(), DEFAULT_SEARCH_LIMIT);
        assert_eq!(results[0].id, "s0");
        assert_eq!(results[49].id, "s49");
    }

    #[test]
    fn test_malformed_items_degrade_gracefully() {
        let modules = vec![Module {
            id: "m".to_string(),
            sections: vec![
                Section::default(),
                Section {
                    id: "ok".to_string(),
                    title: "Directives".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];

        let results = execute("directives", &SearchFilters::default(), &modules, &SearchConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].difficulty, Difficulty::Beginner);
        assert_eq!(results[0].snippet, "...");
    }
}
