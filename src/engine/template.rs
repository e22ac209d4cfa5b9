//! Template expansion.
//!
//! Templates are stored scheme-less and carry a single `%s` placeholder:
//!
//! ```text
//! www.google.com/search?q=%s  +  "cats and dogs"
//!   -> https://www.google.com/search?q=cats+and+dogs
//! ```
//!
//! Encoding is RFC 3986 percent-encoding of the whole term followed by a
//! literal `%20` -> `+` rewrite. This is not form encoding: every other
//! reserved character keeps its percent-encoded form.

use crate::PLACEHOLDER;

/// Percent-encode `term` and turn encoded spaces into `+`.
pub fn encode_term(term: &str) -> String {
    urlencoding::encode(term).replace("%20", "+")
}

/// True when `template` already starts with a URL scheme (`https://`, `ftp://`, ...).
pub fn has_scheme(template: &str) -> bool {
    regex!(r"^[A-Za-z][A-Za-z0-9+.\-]*://").is_match(template)
}

/// Prefix `https://` unless a scheme is present.
pub fn normalize_scheme(template: &str) -> String {
    if has_scheme(template) { template.to_string() } else { format!("https://{template}") }
}

/// Remove a leading `http://` or `https://` (any case).
pub fn strip_scheme(template: &str) -> &str {
    match regex!(r"(?i)^https?://").find(template) {
        Some(m) => &template[m.end()..],
        None => template,
    }
}

/// Replace the first `%s` in `template` with `encoded`.
///
/// Returns `None` when the template has no placeholder; the caller decides
/// how to degrade.
pub fn substitute(template: &str, encoded: &str) -> Option<String> {
    template.contains(PLACEHOLDER).then(|| template.replacen(PLACEHOLDER, encoded, 1))
}

/// Full expansion: scheme, encoding, substitution.
///
/// A template without placeholder is returned (with scheme) unchanged and the
/// second value is `false`.
pub fn expand_template(template: &str, term: &str) -> (String, bool) {
    let with_scheme = normalize_scheme(template);
    match substitute(&with_scheme, &encode_term(term)) {
        Some(url) => (url, true),
        None => (with_scheme, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_plus_after_percent_encoding() {
        let url = substitute("example.com/s?q=%s", &encode_term("cats and dogs")).unwrap();
        assert_eq!(url, "example.com/s?q=cats+and+dogs");
    }

    #[test]
    fn reserved_characters_stay_percent_encoded() {
        assert_eq!(encode_term("a+b&c=d/e?"), "a%2Bb%26c%3Dd%2Fe%3F");
        assert_eq!(encode_term("!g x"), "%21g+x");
        assert_eq!(encode_term("café"), "caf%C3%A9");
    }

    #[test]
    fn only_first_placeholder_is_replaced() {
        assert_eq!(substitute("x.com/%s/%s", "a").unwrap(), "x.com/a/%s");
    }

    #[test]
    fn encoded_term_containing_placeholder_text_is_not_reexpanded() {
        assert_eq!(substitute("x.com/?q=%s", "%25s").unwrap(), "x.com/?q=%25s");
    }

    #[test]
    fn scheme_is_added_only_when_missing() {
        assert_eq!(normalize_scheme("github.com/search?q=%s"), "https://github.com/search?q=%s");
        assert_eq!(normalize_scheme("http://intranet/?q=%s"), "http://intranet/?q=%s");
        assert_eq!(normalize_scheme("HTTPS://x.com"), "HTTPS://x.com");
    }

    #[test]
    fn strip_scheme_handles_both_schemes() {
        assert_eq!(strip_scheme("https://x.com/?q=%s"), "x.com/?q=%s");
        assert_eq!(strip_scheme("HTTP://x.com"), "x.com");
        assert_eq!(strip_scheme("x.com"), "x.com");
        assert_eq!(strip_scheme("ftp://x.com"), "ftp://x.com");
    }

    #[test]
    fn missing_placeholder_degrades_to_raw_template() {
        assert_eq!(expand_template("example.com/home", "cats"), ("https://example.com/home".to_string(), false));
        assert_eq!(expand_template("example.com/?q=%s", ""), ("https://example.com/?q=".to_string(), true));
    }
}
