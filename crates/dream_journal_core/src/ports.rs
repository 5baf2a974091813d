//! crates/dream_journal_core/src/ports.rs
//!
//! Defines the service contracts (traits) the dream journal depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! core independent of the database and the AI providers behind it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AnalysisOptions, AnalysisOutcome, DateRange, DreamEntry, DreamEntryPatch, GeneratedImage,
    ImageRequest, JournalPromptResponse, NewDreamEntry, NewPromptResponse, Transcription,
};
use crate::validation::ValidationError;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Upstream service failed: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    /// Cheap round trip used by readiness probes.
    async fn ping(&self) -> PortResult<()>;

    // --- Dream Entries ---
    async fn create_entry(&self, entry: NewDreamEntry) -> PortResult<DreamEntry>;

    async fn get_entry(&self, entry_id: Uuid) -> PortResult<DreamEntry>;

    /// Entries for `user_id` inside `range`, newest entry date first.
    async fn list_entries(
        &self,
        user_id: &str,
        range: &DateRange,
        limit: Option<u32>,
    ) -> PortResult<Vec<DreamEntry>>;

    /// Applies `patch` and refreshes `updated_at`.
    async fn update_entry(&self, entry_id: Uuid, patch: DreamEntryPatch) -> PortResult<DreamEntry>;

    // --- Journal Prompt Responses ---
    async fn create_prompt_response(
        &self,
        response: NewPromptResponse,
    ) -> PortResult<JournalPromptResponse>;

    /// Responses for one entry ordered by `prompt_order`.
    async fn get_prompt_responses(&self, entry_id: Uuid) -> PortResult<Vec<JournalPromptResponse>>;
}

#[async_trait]
pub trait SpeechToTextService: Send + Sync {
    /// Transcribes an uploaded audio file into text.
    async fn transcribe_audio(&self, file_name: &str, audio_data: Vec<u8>) -> PortResult<Transcription>;
}

#[async_trait]
pub trait DreamAnalysisService: Send + Sync {
    /// Extracts mood, themes, symbols and an interpretation from dream text.
    async fn analyze_dream(
        &self,
        dream_text: &str,
        options: AnalysisOptions,
    ) -> PortResult<AnalysisOutcome>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Renders an already enhanced prompt.
    async fn generate_image(&self, request: &ImageRequest) -> PortResult<GeneratedImage>;
}
