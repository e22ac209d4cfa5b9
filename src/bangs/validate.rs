//! Validation of a custom bang before it is added, edited, or imported.
//!
//! Validation is pure: it never touches the registry. Callers persist the
//! entry only on `Ok(Validation::Accepted)`; `AlreadyPresent` means the exact
//! key + template pair exists and there is nothing to do.
//!
//! Checks run in this order and the first failure wins:
//!
//! ```text
//! key shape ─▶ URL parses ─▶ host != hosting domain ─▶ key collision ─▶ `%s` present
//! ```

use crate::engine::strip_scheme;
use crate::params::RESERVED_PARAMS;
use crate::{BANG_SIGIL, BangRegistry, Namespace, PLACEHOLDER, SETTINGS_KEY};
use thiserror::Error;

/// Successful validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// New bang; safe to persist.
    Accepted,
    /// Identical key and template already exist.
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bang key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("'{0}' is not a valid URL")]
    InvalidUrl(String),

    /// The template points back at the redirector itself.
    #[error("bang host '{host}' is the hosting domain")]
    LoopDetected { host: String },

    #[error("bang !{key} already exists in the {namespace:?} mapping")]
    DuplicateKey { key: String, namespace: Namespace },

    #[error("template '{0}' has no %s placeholder")]
    MissingPlaceholder(String),
}

/// True for legacy templates that expect the term appended at the end
/// (`www.google.com/search?q=`).
pub fn is_suffix_template(template: &str) -> bool {
    !template.contains(PLACEHOLDER) && template.ends_with('=')
}

/// The stored form of a template: scheme dropped, legacy suffix templates
/// given a trailing `%s`.
pub fn canonical_template(value: &str) -> String {
    let stripped = strip_scheme(value.trim());
    if is_suffix_template(stripped) { format!("{stripped}{PLACEHOLDER}") } else { stripped.to_string() }
}

/// Validate `key` → `candidate` against `registry` for a page served from `host`.
///
/// `candidate` may carry an `http(s)://` scheme; it is compared scheme-less.
pub fn validate(
    key: &str,
    candidate: &str,
    registry: &BangRegistry,
    host: &str,
) -> Result<Validation, ValidationError> {
    check_key(key)?;

    let template = strip_scheme(candidate.trim());
    let parsed = url::Url::parse(&format!("https://{template}"))
        .map_err(|_| ValidationError::InvalidUrl(candidate.to_string()))?;
    let bang_host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(ValidationError::InvalidUrl(candidate.to_string())),
    };

    if bang_host.eq_ignore_ascii_case(host.trim()) {
        return Err(ValidationError::LoopDetected { host: bang_host.to_string() });
    }

    let canonical = canonical_template(template);
    if let Some((namespace, existing)) = registry.lookup(key) {
        if existing == canonical {
            return Ok(Validation::AlreadyPresent);
        }
        return Err(ValidationError::DuplicateKey { key: key.to_string(), namespace });
    }

    if !canonical.contains(PLACEHOLDER) {
        return Err(ValidationError::MissingPlaceholder(template.to_string()));
    }

    Ok(Validation::Accepted)
}

fn check_key(key: &str) -> Result<(), ValidationError> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.starts_with(BANG_SIGIL) {
        Some("key must not start with '!'")
    } else if key.chars().any(char::is_whitespace) {
        Some("key must not contain whitespace")
    } else if key.contains('|') {
        Some("key must not contain '|'")
    } else if RESERVED_PARAMS.contains(&key) {
        Some("key is a reserved parameter name")
    } else if key == SETTINGS_KEY {
        Some("!settings always opens the settings page")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationError::InvalidKey { key: key.to_string(), reason }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HOST: &str = "bang.town";

    fn registry() -> BangRegistry {
        let custom = HashMap::from([("mdn".to_string(), "developer.mozilla.org/search?q=%s".to_string())]);
        BangRegistry::with_builtins(custom)
    }

    #[test]
    fn accepts_new_bang() {
        assert_eq!(validate("crates", "crates.io/search?q=%s", &registry(), HOST), Ok(Validation::Accepted));
        assert_eq!(validate("crates", "https://crates.io/search?q=%s", &registry(), HOST), Ok(Validation::Accepted));
    }

    #[test]
    fn loop_detected_regardless_of_path() {
        for candidate in ["bang.town/b/?q=%s", "https://bang.town", "BANG.TOWN/anything?x=%s#frag"] {
            assert_eq!(
                validate("loop", candidate, &registry(), HOST),
                Err(ValidationError::LoopDetected { host: "bang.town".into() })
            );
        }
    }

    #[test]
    fn subdomain_is_not_a_loop() {
        assert_eq!(validate("docs", "docs.bang.town/?q=%s", &registry(), HOST), Ok(Validation::Accepted));
    }

    #[test]
    fn missing_placeholder_rejected_but_suffix_template_allowed() {
        assert_eq!(
            validate("home", "example.com/home", &registry(), HOST),
            Err(ValidationError::MissingPlaceholder("example.com/home".into()))
        );
        assert_eq!(validate("old", "example.com/search?q=", &registry(), HOST), Ok(Validation::Accepted));
    }

    #[test]
    fn duplicate_key_with_different_template() {
        assert_eq!(
            validate("g", "example.com/?q=%s", &registry(), HOST),
            Err(ValidationError::DuplicateKey { key: "g".into(), namespace: Namespace::BuiltIn })
        );
        assert_eq!(
            validate("mdn", "example.com/?q=%s", &registry(), HOST),
            Err(ValidationError::DuplicateKey { key: "mdn".into(), namespace: Namespace::Custom })
        );
    }

    #[test]
    fn exact_duplicate_is_benign() {
        assert_eq!(
            validate("g", "https://www.google.com/search?q=%s", &registry(), HOST),
            Ok(Validation::AlreadyPresent)
        );
        assert_eq!(
            validate("mdn", "developer.mozilla.org/search?q=%s", &registry(), HOST),
            Ok(Validation::AlreadyPresent)
        );
    }

    #[test]
    fn suffix_template_matches_its_stored_form() {
        let mut custom = HashMap::new();
        custom.insert("old".to_string(), "www.example.com/s?q=%s".to_string());
        let registry = BangRegistry::with_builtins(custom);
        assert_eq!(validate("old", "www.example.com/s?q=", &registry, HOST), Ok(Validation::AlreadyPresent));
        assert_eq!(validate("old", "https://www.example.com/s?q=", &registry, HOST), Ok(Validation::AlreadyPresent));
        assert_eq!(validate("g", "https://www.google.com/search?q=", &registry, HOST), Ok(Validation::AlreadyPresent));
    }

    #[test]
    fn canonical_forms() {
        assert_eq!(canonical_template(" https://x.test/?q= "), "x.test/?q=%s");
        assert_eq!(canonical_template("x.test/?q=%s&lang=en"), "x.test/?q=%s&lang=en");
        assert_eq!(canonical_template("x.test/home"), "x.test/home");
    }

    #[test]
    fn invalid_url() {
        let res = validate("bad", "exa mple.com/?q=%s", &registry(), HOST);
        assert!(matches!(res, Err(ValidationError::InvalidUrl(_))));
        assert!(matches!(validate("bad", "", &registry(), HOST), Err(ValidationError::InvalidUrl(_))));
    }

    #[test]
    fn invalid_keys() {
        for key in ["", "!g", "a b", "a|b", "_q", "q", "_d", "default", "_b", "settings"] {
            let res = validate(key, "example.com/?q=%s", &registry(), HOST);
            assert!(matches!(res, Err(ValidationError::InvalidKey { .. })), "key {key:?} should be rejected");
        }
    }
}
