//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification and the response
//! bodies shared by several handler modules.

use crate::web::{ai, cards, entries, health, prompts, statistics};
use chrono::{DateTime, NaiveDate, Utc};
use dream_journal_core::{CardDesign, DreamAnalysis, DreamEntry, JournalPromptResponse};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        entries::list_entries_handler,
        entries::create_entry_handler,
        entries::get_entry_handler,
        entries::update_entry_handler,
        entries::enhance_entry_handler,
        prompts::generate_prompts_handler,
        prompts::create_prompt_response_handler,
        cards::create_card_handler,
        statistics::get_statistics_handler,
        ai::speech_to_text_handler,
        ai::analyze_dream_handler,
        ai::generate_image_handler,
        ai::enhance_prompt_handler,
        ai::list_styles_handler,
        ai::list_costs_handler,
        health::health_handler,
        health::liveness_handler,
        health::readiness_handler,
    ),
    components(
        schemas(
            EntryBody,
            PromptResponseBody,
            AnalysisBody,
            entries::CreateEntryRequest,
            entries::UpdateEntryRequest,
            entries::EnhanceEntryRequest,
            entries::ListEntriesResponse,
            entries::EntryResponse,
            entries::EnhancedImageBody,
            entries::EnhanceResults,
            entries::EnhanceEntryResponse,
            prompts::AnsweredPrompt,
            prompts::GeneratePromptsRequest,
            prompts::GeneratePromptsResponse,
            prompts::CreatePromptResponseRequest,
            prompts::PromptResponseEnvelope,
            cards::CardResponse,
            statistics::DateRangeBody,
            statistics::StatisticsBody,
            statistics::StatisticsResponse,
            ai::TranscriptionResponse,
            ai::AnalyzeDreamRequest,
            ai::AnalyzeDreamResponse,
            ai::GenerateImageRequest,
            ai::GenerateImageResponse,
            ai::EnhancePromptRequest,
            ai::EnhancePromptResponse,
            ai::StyleBody,
            ai::StylesResponse,
            health::HealthResponse,
            health::LivenessResponse,
            health::ReadinessChecks,
            health::ReadinessResponse,
        )
    ),
    tags(
        (name = "Dream Journal API", description = "Journal entries, follow-up prompts, statistics and AI enhancement.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Response Bodies
//=========================================================================================

/// A dream entry as sent to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryBody {
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
    pub lucidity_level: u8,
    pub vividness_level: u8,
    pub ai_prompt: Option<String>,
    pub art_style: String,
    pub image_url: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub card_design: Option<CardDesign>,
    /// Only present on single-entry reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<Vec<PromptResponseBody>>,
}

impl EntryBody {
    pub fn with_prompts(mut self, prompts: Vec<JournalPromptResponse>) -> Self {
        self.prompts = Some(prompts.into_iter().map(PromptResponseBody::from).collect());
        self
    }
}

impl From<DreamEntry> for EntryBody {
    fn from(entry: DreamEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            entry_date: entry.entry_date,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            original_transcription: entry.original_transcription,
            enhanced_description: entry.enhanced_description,
            dream_title: entry.dream_title,
            emotions: entry.emotions,
            themes: entry.themes,
            symbols: entry.symbols,
            lucidity_level: entry.lucidity_level.get(),
            vividness_level: entry.vividness_level.get(),
            ai_prompt: entry.ai_prompt,
            art_style: entry.art_style.to_string(),
            image_url: entry.image_url,
            card_design: entry.card_design,
            prompts: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromptResponseBody {
    pub id: Uuid,
    pub dream_entry_id: Uuid,
    pub prompt_text: String,
    pub response_transcription: Option<String>,
    pub prompt_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<JournalPromptResponse> for PromptResponseBody {
    fn from(prompt: JournalPromptResponse) -> Self {
        Self {
            id: prompt.id,
            dream_entry_id: prompt.dream_entry_id,
            prompt_text: prompt.prompt_text,
            response_transcription: prompt.response_transcription,
            prompt_order: prompt.prompt_order,
            created_at: prompt.created_at,
        }
    }
}

/// The structured analysis of a dream.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisBody {
    pub mood: String,
    pub themes: Vec<String>,
    pub symbols: Vec<String>,
    pub interpretation: String,
    pub emotional_tone: String,
    pub personal_growth: String,
}

impl From<DreamAnalysis> for AnalysisBody {
    fn from(analysis: DreamAnalysis) -> Self {
        Self {
            mood: analysis.mood,
            themes: analysis.themes,
            symbols: analysis.symbols,
            interpretation: analysis.interpretation,
            emotional_tone: analysis.emotional_tone,
            personal_growth: analysis.personal_growth,
        }
    }
}
