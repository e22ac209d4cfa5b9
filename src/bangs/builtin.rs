//! Built-in bang table.
//!
//! These are the low-priority resolution source: any custom bang with the
//! same key shadows them. Templates are trusted to carry exactly one `%s`
//! (checked by the tests below, not at runtime).

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// One row of the built-in table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuiltinBang {
    pub key: &'static str,
    pub template: &'static str,
    /// Human-readable name for listings.
    pub name: &'static str,
}

static BUILTINS: &[BuiltinBang] = &[
    bang!("s", "chat.openai.com?model=gpt-4o&hints=search&q=%s", "ChatGPT Search with GPT-4"),
    bang!("4o", "chat.openai.com?model=gpt-4&q=%s", "ChatGPT with GPT-4"),
    bang!("t3", "www.t3.chat/new?q=%s", "T3 Chat"),
    bang!("w", "en.wikipedia.org/w/index.php?search=%s", "Wikipedia"),
    bang!("yt", "www.youtube.com/results?search_query=%s", "YouTube"),
    bang!("gh", "github.com/search?q=%s", "GitHub"),
    bang!("so", "stackoverflow.com/search?q=%s", "Stack Overflow"),
    bang!("a", "www.amazon.com/s?k=%s", "Amazon"),
    bang!("r", "www.reddit.com/search?q=%s", "Reddit"),
    bang!("x", "x.com/search?q=%s", "X (Twitter)"),
    bang!("imdb", "www.imdb.com/find?q=%s", "IMDb"),
    bang!("map", "www.google.com/maps?q=%s", "Google Maps"),
    bang!("g", "www.google.com/search?q=%s", "Google Search"),
    bang!("ddg", "duckduckgo.com?q=%s", "DuckDuckGo"),
    bang!("pp", "perplexity.ai?q=%s", "Perplexity AI"),
];

static BY_KEY: Lazy<HashMap<&'static str, &'static BuiltinBang>> =
    Lazy::new(|| BUILTINS.iter().map(|b| (b.key, b)).collect());

/// All built-in bangs in display order.
pub fn builtins() -> &'static [BuiltinBang] {
    BUILTINS
}

/// Template for a built-in key.
pub fn lookup(key: &str) -> Option<&'static str> {
    BY_KEY.get(key).map(|b| b.template)
}

/// Display name for `key`, or the key itself when it is not built in.
pub fn display_name(key: &str) -> &str {
    BY_KEY.get(key).map(|b| b.name).unwrap_or(key)
}

/// Owned key → template map, as stored in a `BangRegistry`.
pub fn builtin_map() -> HashMap<String, String> {
    BUILTINS.iter().map(|b| (b.key.to_string(), b.template.to_string())).collect()
}
