//! crates/dream_journal_core/src/validation.rs
//!
//! Boundary checks for user-supplied dream data. Everything here rejects bad
//! input with a field-level error rather than coercing it.

use chrono::NaiveDate;

pub const MAX_DREAM_TEXT_LENGTH: usize = 5000;
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;
pub const ALLOWED_AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "mp4", "m4a", "wav", "webm", "ogg"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("{field} must be a date in YYYY-MM-DD format, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("Invalid audio file: {0}")]
    InvalidAudio(String),
}

/// A lucidity or vividness score on the 0..=5 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;

    /// Checks `value` for the rating field `field`.
    pub fn parse(field: &'static str, value: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::OutOfRange {
                field,
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
                value,
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Dream text sent for analysis or imagery must be present and reasonably sized.
pub fn validate_dream_text<'a>(field: &'static str, text: &'a str) -> Result<&'a str, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    check_max_chars(field, text, MAX_DREAM_TEXT_LENGTH)?;
    Ok(text)
}

pub fn check_max_chars(field: &'static str, text: &str, max: usize) -> Result<(), ValidationError> {
    if text.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Parses an optional query/body date, treating empty strings as absent.
pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_date(field, raw).map(Some),
    }
}

/// Audio uploads must carry a known extension and stay under the size cap.
pub fn validate_audio_upload(file_name: &str, size: usize) -> Result<(), ValidationError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::InvalidAudio(format!(
            "unsupported file extension '{}'",
            extension
        )));
    }
    if size == 0 {
        return Err(ValidationError::InvalidAudio("file is empty".to_string()));
    }
    if size > MAX_AUDIO_BYTES {
        return Err(ValidationError::InvalidAudio(format!(
            "file exceeds {} bytes",
            MAX_AUDIO_BYTES
        )));
    }
    Ok(())
}
