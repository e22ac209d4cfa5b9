//! Bang resolution engine.
//!
//! This module is the entry point for turning a raw query into a navigation
//! target. It is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! raw query ── split_query ──▶ ParsedQuery            (query.rs)
//!                                   │
//!                                   v
//!                    resolve_query (resolve.rs)
//!                      - `!settings`  -> SettingsNavigation
//!                      - `!key`       -> custom, then built-in
//!                      - no bang      -> default key (namespace aware)
//!                      - unresolved   -> external fallback
//!                                   │
//!                                   v
//!                    expand_template (template.rs)
//!                      - https:// if scheme-less
//!                      - RFC 3986 encode, then space -> `+`
//!                      - first `%s` replaced
//!                                   │
//!                                   v
//!                        Resolution + ResolveTrace  (trace.rs)
//! ```
//!
//! Nothing in here performs I/O. Every non-empty query terminates in a
//! `Resolution`; the external fallback template is the catch-all.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=bangtown=debug` to see which namespace matched.

#[path = "engine/query.rs"]
mod query;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/template.rs"]
mod template;
#[path = "engine/trace.rs"]
mod trace;

pub use query::split_query;
pub use resolve::resolve_query;
pub use template::{encode_term, normalize_scheme, strip_scheme, substitute};
pub use trace::{ResolveTrace, Source};
