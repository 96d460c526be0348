//! Snippet generation
//!
//! Produces a short excerpt around the first match of the query and wraps
//! every occurrence of the query in `<mark>` tags. The content itself is not
//! escaped; it comes from trusted, pre-sanitized learning material.

use regex::{Regex, RegexBuilder};

use crate::search::config::{ELLIPSIS, SNIPPET_CONTEXT_CHARS};

/// Cut an excerpt of `content` around the first case-insensitive match of `query`.
///
/// Lengths are counted in characters. Without a match the first `max_length`
/// characters are returned with an ellipsis, which is appended even when
/// the content is shorter than `max_length`.
pub fn generate_snippet(content: &str, query: &str, max_length: usize) -> String {
    if content.is_empty() || query.is_empty() {
        return truncate_with_ellipsis(content, max_length);
    }

    let Some(pattern) = literal_pattern(query) else {
        return truncate_with_ellipsis(content, max_length);
    };
    let Some(found) = pattern.find(content) else {
        return truncate_with_ellipsis(content, max_length);
    };

    let match_index = content[..found.start()].chars().count();
    let total = content.chars().count();
    let start = match_index.saturating_sub(SNIPPET_CONTEXT_CHARS);
    let end = (match_index + query.chars().count() + SNIPPET_CONTEXT_CHARS).min(total);

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(content.chars().skip(start).take(end - start));
    if end < total {
        snippet.push_str(ELLIPSIS);
    }

    highlight(&snippet, &pattern)
}

fn highlight(text: &str, pattern: &Regex) -> String {
    pattern.replace_all(text, "<mark>$0</mark>").into_owned()
}

fn literal_pattern(query: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

fn truncate_with_ellipsis(content: &str, max_length: usize) -> String {
    let mut truncated: String = content.chars().take(max_length).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
