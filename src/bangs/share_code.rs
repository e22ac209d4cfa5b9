//! Share codes: a single bang packed into a string users can paste.
//!
//! Encoding always produces `base64(key|template)`. Decoding accepts every
//! format earlier versions handed out, tried in this order:
//!
//! 1. raw `key|template` (recognized by the `|`, which base64 never contains)
//! 2. `base64(key|template)`
//! 3. `base64({"key": .., "url": ..})` (first-generation JSON codes)
//!
//! The result is always a canonical, scheme-less [`BangEntry`].

use crate::BangEntry;
use crate::engine::strip_scheme;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

const DELIMITER: char = '|';

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("share code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("share code is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("share code JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("share code has no '|' delimiter")]
    MissingDelimiter,

    #[error("share code has an empty key")]
    EmptyKey,

    #[error("share code has an empty template")]
    EmptyTemplate,
}

/// Encode `entry` as `base64(key|template)`.
pub fn encode(entry: &BangEntry) -> String {
    STANDARD.encode(format!("{}{DELIMITER}{}", entry.key, entry.template))
}

/// Decode any supported share-code format.
pub fn decode(code: &str) -> Result<BangEntry, DecodeError> {
    let code = code.trim();
    if code.contains(DELIMITER) {
        return split_pair(code);
    }

    let text = String::from_utf8(STANDARD.decode(code)?)?;
    if text.trim_start().starts_with('{') {
        let entry: BangEntry = serde_json::from_str(&text)?;
        return canonical(&entry.key, &entry.template);
    }
    split_pair(&text)
}

fn split_pair(text: &str) -> Result<BangEntry, DecodeError> {
    let (key, template) = text.split_once(DELIMITER).ok_or(DecodeError::MissingDelimiter)?;
    canonical(key, template)
}

fn canonical(key: &str, template: &str) -> Result<BangEntry, DecodeError> {
    let key = key.trim();
    let template = strip_scheme(template.trim());
    if key.is_empty() {
        return Err(DecodeError::EmptyKey);
    }
    if template.is_empty() {
        return Err(DecodeError::EmptyTemplate);
    }
    Ok(BangEntry::new(key, template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_as_base64_pair() {
        let code = encode(&BangEntry::new("g", "www.google.com/search?q=%s"));
        assert_eq!(code, "Z3x3d3cuZ29vZ2xlLmNvbS9zZWFyY2g/cT0lcw==");
        assert_eq!(STANDARD.decode(&code).unwrap(), b"g|www.google.com/search?q=%s");
    }

    #[test]
    fn decodes_raw_pair() {
        let entry = decode("mdn|https://developer.mozilla.org/search?q=%s").unwrap();
        assert_eq!(entry, BangEntry::new("mdn", "developer.mozilla.org/search?q=%s"));
    }

    #[test]
    fn template_may_contain_delimiter() {
        let entry = decode("p|example.com/?q=%s|x").unwrap();
        assert_eq!(entry.template, "example.com/?q=%s|x");
    }

    #[test]
    fn decodes_legacy_json_code() {
        let code = STANDARD.encode(r#"{"key":"gh","url":"github.com/search?q=%s"}"#);
        assert_eq!(decode(&code).unwrap(), BangEntry::new("gh", "github.com/search?q=%s"));
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(matches!(decode("not base64 !!"), Err(DecodeError::Base64(_))));
        assert!(matches!(decode(&STANDARD.encode("no delimiter")), Err(DecodeError::MissingDelimiter)));
        assert!(matches!(decode("|example.com/?q=%s"), Err(DecodeError::EmptyKey)));
        assert!(matches!(decode("k|"), Err(DecodeError::EmptyTemplate)));
        assert!(matches!(decode(&STANDARD.encode(r#"{"key":"k"}"#)), Err(DecodeError::Json(_))));
        assert!(matches!(decode(&STANDARD.encode([0xff, 0xfe])), Err(DecodeError::Utf8(_))));
    }

    proptest! {
        #[test]
        fn round_trips_valid_entries(key in "[A-Za-z0-9_.-]{1,12}", template in "[a-z0-9.]{1,20}/[!-~]{0,30}") {
            let entry = BangEntry::new(key, template);
            prop_assert_eq!(decode(&encode(&entry)).unwrap(), entry);
        }

        #[test]
        fn garbage_never_panics(code in "\\PC*") {
            let _ = decode(&code);
        }
    }
}
