//! Tokenization of normalized text.

use super::normalizer::normalize;

/// Split text into normalized tokens, preserving order and duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Tokenize a query, separating a trailing incomplete token.
///
/// If the normalized query does not end in a space, the last segment is
/// considered still being typed and is returned apart for prefix
/// expansion. Complete tokens come back sorted and deduplicated.
pub fn tokenize_for_search(query: &str) -> (Vec<String>, String) {
    if query.is_empty() {
        return (Vec::new(), String::new());
    }

    let normalized = normalize(query);
    if normalized.is_empty() || normalized == " " {
        return (Vec::new(), String::new());
    }

    let mut tokens: Vec<String> = normalized
        .split(' ')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();
    if tokens.is_empty() {
        return (Vec::new(), String::new());
    }

    let incomplete = if normalized.ends_with(' ') {
        String::new()
    } else {
        tokens.pop().unwrap_or_default()
    };

    tokens.sort_unstable();
    tokens.dedup();

    (tokens, incomplete)
}
