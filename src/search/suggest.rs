use crate::content::Module;
use crate::search::config::MIN_SUGGESTION_QUERY_LENGTH;

/// Get search suggestions based on a partial query.
///
/// Module titles come first, then for each section its title followed by its
/// tags, all in stored order. Duplicates are dropped and at most `limit`
/// entries are returned.
pub fn get_suggestions(partial_query: &str, modules: &[Module], limit: usize) -> Vec<String> {
    let query = partial_query.to_lowercase();
    if query.chars().count() < MIN_SUGGESTION_QUERY_LENGTH {
        return Vec::new();
    }

    let mut suggestions: Vec<String> = Vec::new();
    let mut add = |candidate: &str| {
        if suggestions.len() < limit
            && candidate.to_lowercase().contains(&query)
            && !suggestions.iter().any(|s| s == candidate)
        {
            suggestions.push(candidate.to_string());
        }
    };

    for module in modules {
        add(&module.title);

        for section in &module.sections {
            add(&section.title);
            for tag in &section.tags {
                add(tag);
            }
        }
    }

    suggestions
}
