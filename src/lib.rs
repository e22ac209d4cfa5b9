extern crate self as bangtown;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[macro_use]
mod macros;
mod api;
mod bangs;
mod engine;
mod params;
mod settings;

pub use api::{
    Context, DEFAULT_FALLBACK_TEMPLATE, DEFAULT_HOST, Navigator, Options, ResolveDetails, ResolveResult,
    ResolveResultVerbose, redirect, resolve, resolve_verbose_with, resolve_with,
};
pub use bangs::builtin::{BuiltinBang, builtin_map, builtins, display_name, lookup as lookup_builtin};
pub use bangs::share_code::{DecodeError, decode as decode_share_code, encode as encode_share_code};
pub use bangs::validate::{Validation, ValidationError, validate};
pub use engine::{ResolveTrace, Source, encode_term, normalize_scheme, split_query, strip_scheme, substitute};
pub use params::{ParamFormats, ParsedParams, RESERVED_PARAMS, parse_params};
pub use settings::{BuiltinListing, CustomBangs, ImportError};

/// The character that marks the first token of a query as a bang.
pub const BANG_SIGIL: char = '!';

/// Placeholder token replaced by the encoded search term.
pub const PLACEHOLDER: &str = "%s";

/// Bang key that opens the configuration surface instead of searching.
pub const SETTINGS_KEY: &str = "settings";

// --- Domain types -----------------------------------------------------------

/// A single key → template mapping.
///
/// `template` is stored scheme-less (`www.google.com/search?q=%s`); the
/// resolver adds `https://` when building the destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BangEntry {
    pub key: String,
    #[serde(rename = "url")]
    pub template: String,
}

impl BangEntry {
    pub fn new(key: impl Into<String>, template: impl Into<String>) -> Self {
        Self { key: key.into(), template: template.into() }
    }
}

/// Which mapping a key was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Namespace {
    Custom,
    BuiltIn,
}

/// Where the default key (used for queries without a bang) is looked up.
///
/// `Any` follows the normal custom-first precedence; `BuiltIn` is selected by
/// the legacy `_b` flag and skips the custom mapping entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DefaultNamespace {
    #[default]
    Any,
    BuiltIn,
}

/// Everything the resolver needs, rebuilt from the URL on every request.
///
/// Invariant: `custom` shadows `built_in` for identical keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BangRegistry {
    pub custom: HashMap<String, String>,
    pub built_in: HashMap<String, String>,
    pub default_key: Option<String>,
    pub default_namespace: DefaultNamespace,
    /// Non-query parameters in arrival order, forwarded by `!settings`.
    ///
    /// Empty for hand-built registries; see [`BangRegistry::forward_params`].
    pub params: Vec<(String, String)>,
}

impl BangRegistry {
    /// Registry with the given custom bangs on top of the built-in table.
    pub fn with_builtins(custom: HashMap<String, String>) -> Self {
        Self { custom, built_in: builtin_map(), ..Self::default() }
    }

    pub fn default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = Some(key.into());
        self
    }

    pub fn default_namespace(mut self, namespace: DefaultNamespace) -> Self {
        self.default_namespace = namespace;
        self
    }

    /// Custom-first lookup.
    pub fn lookup(&self, key: &str) -> Option<(Namespace, &str)> {
        self.custom
            .get(key)
            .map(|t| (Namespace::Custom, t.as_str()))
            .or_else(|| self.built_in.get(key).map(|t| (Namespace::BuiltIn, t.as_str())))
    }

    /// Lookup honoring the namespace selector for the default bang.
    pub fn lookup_default(&self) -> Option<(&str, Namespace, &str)> {
        let key = self.default_key.as_deref()?;
        let found = match self.default_namespace {
            DefaultNamespace::Any => self.lookup(key),
            DefaultNamespace::BuiltIn => self.built_in.get(key).map(|t| (Namespace::BuiltIn, t.as_str())),
        };
        found.map(|(ns, template)| (key, ns, template))
    }

    /// Parameters carried to the settings page.
    ///
    /// Uses the parameters the registry was parsed from when known, otherwise
    /// re-derives them from the custom mapping (sorted by key) and the
    /// default-key preferences.
    pub fn forward_params(&self) -> Vec<(String, String)> {
        if !self.params.is_empty() {
            return self.params.clone();
        }

        let mut out: Vec<(String, String)> = self.custom.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        out.sort();
        if let Some(key) = &self.default_key {
            out.push(("_d".to_string(), key.clone()));
        }
        if self.default_namespace == DefaultNamespace::BuiltIn {
            out.push(("_b".to_string(), "1".to_string()));
        }
        out
    }

    /// True when a custom bang hides a built-in with the same key.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.custom.contains_key(key) && self.built_in.contains_key(key)
    }
}

/// A raw query split into its optional bang key and the search terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuery {
    pub bang_key: Option<String>,
    pub search_terms: String,
}

/// Outcome of resolving a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Navigate to a search destination.
    Redirect { destination_url: String },
    /// `!settings`: open the configuration page carrying these parameters.
    SettingsNavigation { params: Vec<(String, String)> },
}

impl Resolution {
    /// URL to hand to a [`Navigator`].
    ///
    /// Settings navigation is relative to the hosting origin (`/?g=...`).
    pub fn target_url(&self) -> String {
        match self {
            Resolution::Redirect { destination_url } => destination_url.clone(),
            Resolution::SettingsNavigation { params } => {
                let mut serializer = url::form_urlencoded::Serializer::new(String::new());
                serializer.extend_pairs(params.iter());
                format!("/?{}", serializer.finish())
            }
        }
    }

    pub fn destination_url(&self) -> Option<&str> {
        match self {
            Resolution::Redirect { destination_url } => Some(destination_url),
            Resolution::SettingsNavigation { .. } => None,
        }
    }
}
