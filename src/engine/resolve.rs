//! Precedence and fallback.
//!
//! ```text
//! ParsedQuery ──┬─ !settings  ─────────────▶ SettingsNavigation(forward params)
//!               ├─ !key ── custom[key] ────▶ expand(template, remainder)
//!               │       └─ built_in[key] ──▶ expand(template, remainder)
//!               │       └─ (absent) ───────▶ fallback(whole raw query, `!key` kept)
//!               └─ plain ── default key ───▶ expand(template, whole raw query)
//!                        └─ (absent) ──────▶ fallback(whole raw query)
//! ```
//!
//! Custom always wins over built-in for the same key. The `_b` namespace
//! selector only affects the default-key path (see `BangRegistry::lookup_default`).

use super::query::split_query;
use super::template::expand_template;
use super::trace::{ResolveTrace, Source};
use crate::{BangRegistry, Namespace, ParsedQuery, Resolution, SETTINGS_KEY};
use log::{debug, warn};

/// Resolve `raw` against `registry`, falling back to `fallback_template`.
///
/// `raw` must be non-empty; the entry point filters absent queries.
pub fn resolve_query(raw: &str, registry: &BangRegistry, fallback_template: &str) -> (Resolution, ResolveTrace) {
    let parsed = split_query(raw);

    let Some(key) = parsed.bang_key.clone() else {
        return match registry.lookup_default() {
            Some((key, ns, template)) => {
                debug!("no bang, default key !{key} resolved in {ns:?}");
                let trace = trace_for(&parsed, Some(key.to_string()), ns.into(), template, raw);
                expand(template, raw, trace)
            }
            None => {
                debug!("no bang and no usable default key, falling back");
                fallback(raw, fallback_template, parsed, registry.default_key.clone())
            }
        };
    };

    if key == SETTINGS_KEY {
        let params = registry.forward_params();
        debug!("!{SETTINGS_KEY}: forwarding {} parameter(s)", params.len());
        let trace = ResolveTrace {
            parsed,
            key: Some(key),
            source: Source::Settings,
            template: None,
            term: String::new(),
            placeholder_missing: false,
        };
        return (Resolution::SettingsNavigation { params }, trace);
    }

    match registry.lookup(&key) {
        Some((ns, template)) => {
            debug!("!{key} resolved in {ns:?}");
            if ns == Namespace::Custom && registry.built_in.contains_key(&key) {
                debug!("!{key} overrides a built-in bang");
            }
            let trace = trace_for(&parsed, Some(key.clone()), ns.into(), template, &parsed.search_terms);
            expand(template, &parsed.search_terms, trace)
        }
        None => {
            debug!("!{key} is unknown, passing the full query to the fallback engine");
            fallback(raw, fallback_template, parsed, Some(key))
        }
    }
}

fn trace_for(parsed: &ParsedQuery, key: Option<String>, source: Source, template: &str, term: &str) -> ResolveTrace {
    ResolveTrace {
        parsed: parsed.clone(),
        key,
        source,
        template: Some(template.to_string()),
        term: term.to_string(),
        placeholder_missing: false,
    }
}

fn expand(template: &str, term: &str, mut trace: ResolveTrace) -> (Resolution, ResolveTrace) {
    let (destination_url, substituted) = expand_template(template, term);
    if !substituted {
        warn!("template '{template}' has no placeholder, using it as-is");
        trace.placeholder_missing = true;
    }
    (Resolution::Redirect { destination_url }, trace)
}

fn fallback(
    raw: &str,
    fallback_template: &str,
    parsed: ParsedQuery,
    key: Option<String>,
) -> (Resolution, ResolveTrace) {
    let trace = ResolveTrace {
        parsed,
        key,
        source: Source::Fallback,
        template: Some(fallback_template.to_string()),
        term: raw.to_string(),
        placeholder_missing: false,
    };
    expand(fallback_template, raw, trace)
}
