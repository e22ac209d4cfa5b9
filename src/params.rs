//! Compatibility layer for the redirect query string.
//!
//! The mapping *is* the persisted state: every request carries the custom
//! bangs as URL parameters. Several generations of parameter names are in the
//! wild; this module recognizes them in priority order and normalizes them
//! into one canonical [`BangRegistry`] so the resolver never branches on
//! format version.
//!
//! ```text
//! query text     _q  > q
//! default key    _d  > default        (empty value = absent)
//! namespace      _b                   (any value except `0`/`false` => built-in)
//! custom bangs   every other name     (scheme stripped, `...=` suffix => `...=%s`)
//! ```
//!
//! For repeated names the first occurrence wins, like `URLSearchParams::get`.

use crate::bangs::validate::{canonical_template, is_suffix_template};
use crate::engine::strip_scheme;
use crate::{BangRegistry, DefaultNamespace, builtin_map};
use log::trace;
use std::collections::HashMap;

/// Query parameter names with protocol meaning; never custom bang keys.
pub const RESERVED_PARAMS: &[&str] = &[QUERY, LEGACY_QUERY, DEFAULT, LEGACY_DEFAULT, BUILTIN_FLAG];

const QUERY: &str = "_q";
const LEGACY_QUERY: &str = "q";
const DEFAULT: &str = "_d";
const LEGACY_DEFAULT: &str = "default";
const BUILTIN_FLAG: &str = "_b";

bitflags::bitflags! {
    /// Which parameter formats were seen while parsing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFormats: u32 {
        const QUERY            = 1 << 0;
        const LEGACY_QUERY     = 1 << 1;
        const DEFAULT          = 1 << 2;
        const LEGACY_DEFAULT   = 1 << 3;
        const BUILTIN_FLAG     = 1 << 4;
        /// At least one template carried an `http(s)://` scheme.
        const SCHEME_STRIPPED  = 1 << 5;
        /// At least one template used the legacy append-suffix convention.
        const SUFFIX_TEMPLATE  = 1 << 6;
    }
}

impl ParamFormats {
    /// Short names of the set flags, for reports.
    pub fn labels(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

/// A parsed redirect query string.
#[derive(Debug, Clone, Default)]
pub struct ParsedParams {
    /// The first non-blank query, `_q` before `q`.
    pub query: Option<String>,
    pub registry: BangRegistry,
    pub formats: ParamFormats,
}

/// Parse a raw query string (with or without a leading `?`).
pub fn parse_params(query_string: &str) -> ParsedParams {
    let query_string = query_string.strip_prefix('?').unwrap_or(query_string);

    let mut formats = ParamFormats::empty();
    let mut query: Option<String> = None;
    let mut legacy_query: Option<String> = None;
    let mut default_key: Option<String> = None;
    let mut legacy_default: Option<String> = None;
    let mut builtin_flag: Option<String> = None;
    let mut custom: HashMap<String, String> = HashMap::new();
    let mut forwarded: Vec<(String, String)> = Vec::new();

    for (name, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
        let (name, value) = (name.into_owned(), value.into_owned());
        match name.as_str() {
            QUERY => {
                formats |= ParamFormats::QUERY;
                query.get_or_insert(value);
                continue;
            }
            LEGACY_QUERY => {
                formats |= ParamFormats::LEGACY_QUERY;
                legacy_query.get_or_insert(value);
                continue;
            }
            DEFAULT => {
                formats |= ParamFormats::DEFAULT;
                default_key.get_or_insert(value.clone());
            }
            LEGACY_DEFAULT => {
                formats |= ParamFormats::LEGACY_DEFAULT;
                legacy_default.get_or_insert(value.clone());
            }
            BUILTIN_FLAG => {
                formats |= ParamFormats::BUILTIN_FLAG;
                builtin_flag.get_or_insert(value.clone());
            }
            "" => {}
            _ if custom.contains_key(&name) => continue,
            _ => {
                let template = normalize_template(&value, &mut formats);
                trace!("custom bang !{name} -> {template}");
                custom.insert(name.clone(), template);
            }
        }
        forwarded.push((name, value));
    }

    let default_key = [default_key, legacy_default].into_iter().flatten().find(|k| !k.trim().is_empty());
    let default_namespace = match builtin_flag.as_deref().map(str::trim) {
        Some("0") | Some("false") | None => DefaultNamespace::Any,
        Some(_) => DefaultNamespace::BuiltIn,
    };

    let registry = BangRegistry { custom, built_in: builtin_map(), default_key, default_namespace, params: forwarded };
    let query = [query, legacy_query].into_iter().flatten().find(|q| !q.trim().is_empty());
    ParsedParams { query, registry, formats }
}

/// [`canonical_template`], recording which legacy conventions were seen.
fn normalize_template(value: &str, formats: &mut ParamFormats) -> String {
    let stripped = strip_scheme(value.trim());
    if stripped.len() != value.trim().len() {
        *formats |= ParamFormats::SCHEME_STRIPPED;
    }
    if is_suffix_template(stripped) {
        *formats |= ParamFormats::SUFFIX_TEMPLATE;
    }
    canonical_template(stripped)
}
