//! Query splitting.
//!
//! A query is either a bare search phrase (`hello world`) or a bang followed
//! by the search terms (`!g hello world`). Only the first space separates the
//! two; everything after it is kept verbatim, including further spaces.

use crate::{BANG_SIGIL, ParsedQuery};

/// Split `raw` into an optional bang key and the search terms.
///
/// ```text
/// "!g cats and dogs" -> bang_key: Some("g"), search_terms: "cats and dogs"
/// "!g"               -> bang_key: Some("g"), search_terms: ""
/// "cats and dogs"    -> bang_key: None,      search_terms: "cats and dogs"
/// ```
pub fn split_query(raw: &str) -> ParsedQuery {
    let (first, rest) = raw.split_once(' ').unwrap_or((raw, ""));

    match first.strip_prefix(BANG_SIGIL) {
        Some(key) => ParsedQuery { bang_key: Some(key.to_string()), search_terms: rest.to_string() },
        None => ParsedQuery { bang_key: None, search_terms: raw.to_string() },
    }
}
