//! crates/dream_journal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the dream journal.
//! These structs are independent of any database or wire format.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::card::CardDesign;
use crate::styles::ArtStyle;
use crate::validation::Rating;

/// A single journaled dream.
#[derive(Debug, Clone, PartialEq)]
pub struct DreamEntry {
    pub id: Uuid,
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub original_transcription: Option<String>,
    pub enhanced_description: Option<String>,
    pub dream_title: Option<String>,
    pub emotions: Vec<String>,
    pub themes: Vec<String>,
    pub symbols: Vec<String>,
    pub lucidity_level: Rating,
    pub vividness_level: Rating,
    pub ai_prompt: Option<String>,
    pub art_style: ArtStyle,
    pub image_url: Option<String>,
    pub card_design: Option<CardDesign>,
}

impl DreamEntry {
    /// An entry counts as illustrated when it carries a non-empty image URL.
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// The text used for analysis and image generation, if any was written.
    pub fn description(&self) -> Option<&str> {
        self.enhanced_description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// Applies every field present in `patch`. Timestamps are left to the store.
    pub fn apply(&mut self, patch: DreamEntryPatch) {
        if let Some(value) = patch.enhanced_description {
            self.enhanced_description = Some(value);
        }
        if let Some(value) = patch.dream_title {
            self.dream_title = Some(value);
        }
        if let Some(value) = patch.emotions {
            self.emotions = value;
        }
        if let Some(value) = patch.themes {
            self.themes = value;
        }
        if let Some(value) = patch.symbols {
            self.symbols = value;
        }
        if let Some(value) = patch.lucidity_level {
            self.lucidity_level = value;
        }
        if let Some(value) = patch.vividness_level {
            self.vividness_level = value;
        }
        if let Some(value) = patch.ai_prompt {
            self.ai_prompt = Some(value);
        }
        if let Some(value) = patch.art_style {
            self.art_style = value;
        }
        if let Some(value) = patch.image_url {
            self.image_url = Some(value);
        }
        if let Some(value) = patch.card_design {
            self.card_design = Some(value);
        }
    }
}

/// The validated content of an entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDreamEntry {
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub original_transcription: Option<String>,
    pub enhanced_description: Option<String>,
    pub dream_title: Option<String>,
    pub emotions: Vec<String>,
    pub themes: Vec<String>,
    pub symbols: Vec<String>,
    pub lucidity_level: Rating,
    pub vividness_level: Rating,
    pub ai_prompt: Option<String>,
    pub art_style: ArtStyle,
    pub image_url: Option<String>,
    pub card_design: Option<CardDesign>,
}

impl NewDreamEntry {
    /// An empty entry for `user_id` on `entry_date`, with every optional field unset.
    pub fn new(user_id: impl Into<String>, entry_date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            entry_date,
            original_transcription: None,
            enhanced_description: None,
            dream_title: None,
            emotions: Vec::new(),
            themes: Vec::new(),
            symbols: Vec::new(),
            lucidity_level: Rating::default(),
            vividness_level: Rating::default(),
            ai_prompt: None,
            art_style: ArtStyle::default(),
            image_url: None,
            card_design: None,
        }
    }
}

/// A partial update. `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DreamEntryPatch {
    pub enhanced_description: Option<String>,
    pub dream_title: Option<String>,
    pub emotions: Option<Vec<String>>,
    pub themes: Option<Vec<String>>,
    pub symbols: Option<Vec<String>>,
    pub lucidity_level: Option<Rating>,
    pub vividness_level: Option<Rating>,
    pub ai_prompt: Option<String>,
    pub art_style: Option<ArtStyle>,
    pub image_url: Option<String>,
    pub card_design: Option<CardDesign>,
}

/// One follow-up question asked about a dream, with the user's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalPromptResponse {
    pub id: Uuid,
    pub dream_entry_id: Uuid,
    pub prompt_text: String,
    pub response_transcription: Option<String>,
    pub prompt_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPromptResponse {
    pub dream_entry_id: Uuid,
    pub prompt_text: String,
    pub response_transcription: Option<String>,
    pub prompt_order: i32,
}

/// An inclusive calendar-date window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn all_time() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// The start bound as reported back to clients.
    pub fn start_label(&self) -> String {
        self.start
            .map(|date| date.to_string())
            .unwrap_or_else(|| "all_time".to_string())
    }

    /// The end bound as reported back to clients.
    pub fn end_label(&self) -> String {
        self.end
            .map(|date| date.to_string())
            .unwrap_or_else(|| "present".to_string())
    }
}

/// The structured result of analysing a dream's text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DreamAnalysis {
    pub mood: String,
    pub themes: Vec<String>,
    pub symbols: Vec<String>,
    pub interpretation: String,
    pub emotional_tone: String,
    pub personal_growth: String,
}

/// An analysis together with its token and cost accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub analysis: DreamAnalysis,
    pub tokens_used: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub include_symbolism: bool,
    pub include_emotions: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_symbolism: true,
            include_emotions: true,
        }
    }
}

/// What the image collaborator needs to render one picture.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub style: ArtStyle,
    pub quality: crate::styles::ImageQuality,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub image_url: String,
    pub revised_prompt: String,
    pub cost: f64,
    pub generation_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    pub duration_seconds: f64,
    pub cost: f64,
}
