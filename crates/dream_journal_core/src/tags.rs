//! crates/dream_journal_core/src/tags.rs
//!
//! Emotion, theme and symbol labels are persisted as JSON array text. Stored
//! text can be malformed, so decoding is fallible and callers decide how to
//! isolate the failure.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Emotions,
    Themes,
    Symbols,
}

impl TagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::Emotions => "emotions",
            TagKind::Themes => "themes",
            TagKind::Symbols => "symbols",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed label list: {0}")]
pub struct TagDecodeError(#[from] serde_json::Error);

pub fn encode_tags(labels: &[String]) -> String {
    serde_json::Value::from(labels.to_vec()).to_string()
}

/// Decodes stored label text. Absent, blank and `null` values are an empty list.
pub fn decode_tags(raw: Option<&str>) -> Result<Vec<String>, TagDecodeError> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") => Ok(Vec::new()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}
