//! Resolution trace.
//!
//! A small record of the decisions the resolver took for one query. The
//! plain [`crate::resolve_with`] path drops it; [`crate::resolve_verbose_with`]
//! surfaces it together with timing for the CLI report.

use crate::{Namespace, ParsedQuery};
use serde::Serialize;

/// Where the destination template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Source {
    Custom,
    BuiltIn,
    /// External search engine (unknown bang, or no usable default).
    Fallback,
    /// `!settings` navigation; no template involved.
    Settings,
}

impl From<Namespace> for Source {
    fn from(ns: Namespace) -> Self {
        match ns {
            Namespace::Custom => Source::Custom,
            Namespace::BuiltIn => Source::BuiltIn,
        }
    }
}

impl Source {
    pub fn name(self) -> &'static str {
        match self {
            Source::Custom => "custom",
            Source::BuiltIn => "built-in",
            Source::Fallback => "fallback",
            Source::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveTrace {
    pub parsed: ParsedQuery,
    /// Key that was looked up: the bang key, or the default key for plain queries.
    pub key: Option<String>,
    pub source: Source,
    /// Template that was expanded (scheme-less as stored).
    pub template: Option<String>,
    /// Search term handed to the template before encoding.
    pub term: String,
    /// Set when a template had no `%s` and was used as-is.
    pub placeholder_missing: bool,
}
