//! Configuration-side operations on the custom mapping.
//!
//! The settings page edits a list of URL parameters and navigates to the new
//! URL; nothing is stored anywhere else. `CustomBangs` mirrors that: it is an
//! ordered parameter list, every operation returns a new value, and
//! [`CustomBangs::to_query`] produces the string to persist.

use crate::bangs::share_code;
use crate::bangs::validate::{Validation, ValidationError, validate};
use crate::engine::strip_scheme;
use crate::params::{RESERVED_PARAMS, parse_params};
use crate::{BANG_SIGIL, BangEntry, BangRegistry, Context, DecodeError, builtins};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A built-in bang as shown on the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltinListing {
    pub key: &'static str,
    pub name: &'static str,
    pub template: &'static str,
    /// A custom bang with the same key shadows this one.
    pub overridden: bool,
}

/// Ordered custom bangs plus the preference parameters (`_d`, `_b`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomBangs {
    params: Vec<(String, String)>,
}

impl CustomBangs {
    /// Build from a settings-page query string; query parameters are dropped.
    pub fn from_query(query_string: &str) -> Self {
        Self { params: parse_params(query_string).registry.params }
    }

    /// Serialize back to a query string (no leading `?`).
    pub fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.params.iter());
        serializer.finish()
    }

    /// Custom bangs in insertion order.
    pub fn entries(&self) -> Vec<BangEntry> {
        let mut seen = HashSet::new();
        self.params
            .iter()
            .filter(|(k, _)| !k.is_empty() && !RESERVED_PARAMS.contains(&k.as_str()))
            .filter(|(k, _)| seen.insert(k.clone()))
            .map(|(k, v)| BangEntry::new(k.as_str(), strip_scheme(v)))
            .collect()
    }

    /// The registry these parameters resolve against.
    pub fn registry(&self) -> BangRegistry {
        parse_params(&self.to_query()).registry
    }

    /// Add a bang after validation.
    ///
    /// A single leading `!` on the key and an `http(s)://` scheme on the
    /// template are dropped first. An exact duplicate returns an unchanged copy.
    pub fn add(&self, entry: &BangEntry, context: &Context) -> Result<Self, ValidationError> {
        let key = entry.key.trim();
        let key = key.strip_prefix(BANG_SIGIL).unwrap_or(key);
        let template = strip_scheme(entry.template.trim());

        match validate(key, template, &self.registry(), &context.host)? {
            Validation::AlreadyPresent => {
                debug!("!{key} already present, nothing to add");
                Ok(self.clone())
            }
            Validation::Accepted => {
                let mut params = self.params.clone();
                params.push((key.to_string(), template.to_string()));
                Ok(Self { params })
            }
        }
    }

    /// Drop every parameter named `key`.
    pub fn remove(&self, key: &str) -> Self {
        let params = self.params.iter().filter(|(k, _)| k != key).cloned().collect();
        Self { params }
    }

    /// Decode a share code and add the bang it carries.
    pub fn import(&self, code: &str, context: &Context) -> Result<Self, ImportError> {
        let entry = share_code::decode(code)?;
        Ok(self.add(&entry, context)?)
    }

    /// Share code for one of the custom bangs.
    pub fn share_code(&self, key: &str) -> Option<String> {
        self.entries().into_iter().find(|e| e.key == key).map(|e| share_code::encode(&e))
    }

    /// Custom bangs whose key or template contains `term` (case-insensitive).
    pub fn filter(&self, term: &str) -> Vec<BangEntry> {
        let needle = term.to_lowercase();
        self.entries()
            .into_iter()
            .filter(|e| {
                needle.is_empty()
                    || e.key.to_lowercase().contains(&needle)
                    || e.template.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Built-in bangs with their override state.
    pub fn builtin_listing(&self) -> Vec<BuiltinListing> {
        let registry = self.registry();
        builtins()
            .iter()
            .map(|b| BuiltinListing {
                key: b.key,
                name: b.name,
                template: b.template,
                overridden: registry.is_overridden(b.key),
            })
            .collect()
    }

    /// URL to register as the browser's search engine; `%s` is filled in by the browser.
    pub fn search_url(&self, origin: &str) -> String {
        format!("{}&_q=%s", self.redirect_base(origin))
    }

    /// URL that opens these settings on another device.
    pub fn share_url(&self, origin: &str) -> String {
        format!("{}&_q=!settings", self.redirect_base(origin))
    }

    fn redirect_base(&self, origin: &str) -> String {
        format!("{}/b/?{}", origin.trim_end_matches('/'), self.to_query())
    }
}
