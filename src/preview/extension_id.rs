//! Extracts the declared extension id from raw source text.

use once_cell::sync::Lazy;
use regex::Regex;

// Same shape the runtime looks for when compiling: an `id` field assigned a
// single- or double-quoted literal.
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"id:\s*['"]([^'"]+)['"]"#).expect("valid id pattern"));

/// First `id: '...'` / `id: "..."` occurrence in `source`, or `None`.
///
/// Absence of a match is a normal outcome, never an error; arbitrarily large
/// or malformed input only ever yields `None`.
pub fn extract(source: &str) -> Option<&str> {
    ID_PATTERN
        .captures(source)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_quoted_id() {
        assert_eq!(extract("return { id: 'myext', name: 'x' };"), Some("myext"));
    }

    #[test]
    fn extracts_double_quoted_id() {
        assert_eq!(extract("id: \"pen\""), Some("pen"));
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(extract("id: 'first' ... id: 'second'"), Some("first"));
    }

    #[test]
    fn tolerates_whitespace_after_colon() {
        assert_eq!(extract("id:\t 'spaced'"), Some("spaced"));
    }

    #[test]
    fn no_match_is_none() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("const id = 'nope';"), None);
        assert_eq!(extract("id: unquoted"), None);
        assert_eq!(extract("id: ''"), None);
    }
}
