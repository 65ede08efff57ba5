//! URL field sanitization.
//!
//! URL-ish fields arrive from untrusted callers and are stored verbatim in
//! TEXT columns. The only normalization applied before storage is bracket
//! stripping: `[`, `]`, `(`, `)` are removed wherever they appear.

use serde_json::Value;

/// Characters removed from URL-ish fields before storage.
pub const STRIPPED_CHARS: &[char] = &['[', ']', '(', ')'];

/// Remove every `[`, `]`, `(`, `)` from a string.
pub fn strip_brackets(input: &str) -> String {
    input
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect()
}

/// Sanitize a loose JSON value into a storable URL.
///
/// Textual input yields the bracket-stripped string (an empty string stays
/// an empty string); any other shape (null, number, bool, array, object)
/// yields `None`. Total over all input shapes.
pub fn clean(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(strip_brackets(s)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- strip_brackets tests -------------------------------------------------

    #[test]
    fn strips_parens_from_url() {
        assert_eq!(strip_brackets("http://x/(1).png"), "http://x/1.png");
    }

    #[test]
    fn strips_square_brackets() {
        assert_eq!(strip_brackets("a[b]c[d]"), "abcd");
    }

    #[test]
    fn clean_input_is_unchanged() {
        let url = "https://image.tmdb.org/t/p/w500/abc123.jpg";
        assert_eq!(strip_brackets(url), url);
    }

    #[test]
    fn stripping_is_idempotent() {
        let once = strip_brackets("x[(y)]z");
        assert_eq!(strip_brackets(&once), once);
    }

    #[test]
    fn empty_string_stays_empty() {
        assert_eq!(strip_brackets(""), "");
    }

    // -- clean tests ------------------------------------------------------

    #[test]
    fn clean_string_strips_brackets() {
        assert_eq!(
            clean(&json!("http://x/(1).png")),
            Some("http://x/1.png".to_string())
        );
    }

    #[test]
    fn clean_empty_string_is_some_empty() {
        assert_eq!(clean(&json!("")), Some(String::new()));
    }

    #[test]
    fn clean_null_is_none() {
        assert_eq!(clean(&Value::Null), None);
    }

    #[test]
    fn clean_non_textual_is_none() {
        assert_eq!(clean(&json!(42)), None);
        assert_eq!(clean(&json!(true)), None);
        assert_eq!(clean(&json!(["a"])), None);
        assert_eq!(clean(&json!({"url": "a"})), None);
    }
}
