//! services/api/src/web/entries.rs
//!
//! Dream entry handlers: listing, creation, retrieval, partial update and
//! AI enhancement.

use crate::error::ApiError;
use crate::web::rest::{AnalysisBody, EntryBody};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use dream_journal_core::{
    styles::enhance_prompt,
    validation::{check_max_chars, parse_optional_date, MAX_DREAM_TEXT_LENGTH, MAX_TITLE_LENGTH},
    AnalysisOptions, ArtStyle, CardDesign, DateRange, DreamEntryPatch, ImageQuality, ImageRequest,
    NewDreamEntry, Rating, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const DEFAULT_USER_ID: &str = "default_user";
pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 500;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEntriesQuery {
    pub user_id: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct ListEntriesResponse {
    success: bool,
    entries: Vec<EntryBody>,
    total: usize,
}

#[derive(Serialize, ToSchema)]
pub struct EntryResponse {
    success: bool,
    entry: EntryBody,
}

/// Body of `POST /entries`. Every field is optional; unknown keys are ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateEntryRequest {
    pub user_id: Option<String>,
    /// Defaults to today (UTC).
    pub entry_date: Option<String>,
    pub original_transcription: Option<String>,
    pub enhanced_description: Option<String>,
    pub dream_title: Option<String>,
    pub emotions: Vec<String>,
    pub themes: Vec<String>,
    pub symbols: Vec<String>,
    pub lucidity_level: Option<i64>,
    pub vividness_level: Option<i64>,
    pub ai_prompt: Option<String>,
    /// Unknown styles fall back to `ethereal`.
    pub art_style: Option<String>,
    pub image_url: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub card_design: Option<CardDesign>,
}

/// Body of `PUT /entries/{id}`. Only the fields present are changed.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateEntryRequest {
    pub enhanced_description: Option<String>,
    pub dream_title: Option<String>,
    pub emotions: Option<Vec<String>>,
    pub themes: Option<Vec<String>>,
    pub symbols: Option<Vec<String>>,
    pub lucidity_level: Option<i64>,
    pub vividness_level: Option<i64>,
    pub ai_prompt: Option<String>,
    pub art_style: Option<String>,
    pub image_url: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub card_design: Option<CardDesign>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct EnhanceEntryRequest {
    pub generate_image: bool,
    pub analyze_content: bool,
    pub art_style: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EnhancedImageBody {
    url: String,
    prompt: String,
    style: String,
}

#[derive(Serialize, ToSchema)]
pub struct EnhanceResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<AnalysisBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<EnhancedImageBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_error: Option<String>,
    entry: EntryBody,
}

#[derive(Serialize, ToSchema)]
pub struct EnhanceEntryResponse {
    success: bool,
    results: EnhanceResults,
}

//=========================================================================================
// Boundary Validation
//=========================================================================================

fn optional_rating(field: &'static str, value: Option<i64>) -> Result<Option<Rating>, ValidationError> {
    value.map(|v| Rating::parse(field, v)).transpose()
}

fn check_text_fields(
    dream_title: Option<&str>,
    enhanced_description: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(title) = dream_title {
        check_max_chars("dream_title", title, MAX_TITLE_LENGTH)?;
    }
    if let Some(description) = enhanced_description {
        check_max_chars("enhanced_description", description, MAX_DREAM_TEXT_LENGTH)?;
    }
    Ok(())
}

impl CreateEntryRequest {
    pub fn into_new_entry(self) -> Result<NewDreamEntry, ValidationError> {
        let user_id = match self.user_id {
            Some(id) if id.trim().is_empty() => {
                return Err(ValidationError::Blank { field: "user_id" })
            }
            Some(id) => id,
            None => DEFAULT_USER_ID.to_string(),
        };
        let entry_date = parse_optional_date("entry_date", self.entry_date.as_deref())?
            .unwrap_or_else(|| Utc::now().date_naive());
        check_text_fields(self.dream_title.as_deref(), self.enhanced_description.as_deref())?;

        let mut entry = NewDreamEntry::new(user_id, entry_date);
        entry.lucidity_level = optional_rating("lucidity_level", self.lucidity_level)?.unwrap_or_default();
        entry.vividness_level =
            optional_rating("vividness_level", self.vividness_level)?.unwrap_or_default();
        entry.original_transcription = self.original_transcription;
        entry.enhanced_description = self.enhanced_description;
        entry.dream_title = self.dream_title;
        entry.emotions = self.emotions;
        entry.themes = self.themes;
        entry.symbols = self.symbols;
        entry.ai_prompt = self.ai_prompt;
        entry.art_style = ArtStyle::parse_or_default(self.art_style.as_deref());
        entry.image_url = self.image_url;
        entry.card_design = self.card_design;
        Ok(entry)
    }
}

impl UpdateEntryRequest {
    pub fn into_patch(self) -> Result<DreamEntryPatch, ValidationError> {
        check_text_fields(self.dream_title.as_deref(), self.enhanced_description.as_deref())?;
        Ok(DreamEntryPatch {
            lucidity_level: optional_rating("lucidity_level", self.lucidity_level)?,
            vividness_level: optional_rating("vividness_level", self.vividness_level)?,
            enhanced_description: self.enhanced_description,
            dream_title: self.dream_title,
            emotions: self.emotions,
            themes: self.themes,
            symbols: self.symbols,
            ai_prompt: self.ai_prompt,
            art_style: self
                .art_style
                .map(|style| ArtStyle::parse_or_default(Some(&style))),
            image_url: self.image_url,
            card_design: self.card_design,
        })
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List a user's dream entries, newest first.
#[utoipa::path(
    get,
    path = "/entries",
    params(ListEntriesQuery),
    responses(
        (status = 200, description = "Entries for the user", body = ListEntriesResponse),
        (status = 400, description = "Invalid date or limit"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_entries_handler(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<ListEntriesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let user_id = query.user_id.as_deref().unwrap_or(DEFAULT_USER_ID);
    let range = DateRange::new(
        parse_optional_date("start_date", query.start_date.as_deref())?,
        parse_optional_date("end_date", query.end_date.as_deref())?,
    );
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let entries = app_state.db.list_entries(user_id, &range, Some(limit)).await?;
    let entries: Vec<EntryBody> = entries.into_iter().map(EntryBody::from).collect();

    Ok(Json(ListEntriesResponse {
        success: true,
        total: entries.len(),
        entries,
    }))
}

/// Create a new dream entry.
#[utoipa::path(
    post,
    path = "/entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Invalid field value"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_entry_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let new_entry = request.into_new_entry()?;

    let entry = app_state.db.create_entry(new_entry).await?;
    info!("Created dream entry {} for user {}", entry.id, entry.user_id);

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            success: true,
            entry: entry.into(),
        }),
    ))
}

/// Fetch one entry together with its answered prompts.
#[utoipa::path(
    get,
    path = "/entries/{id}",
    params(("id" = Uuid, Path, description = "Dream entry id")),
    responses(
        (status = 200, description = "The entry", body = EntryResponse),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn get_entry_handler(
    State(app_state): State<Arc<AppState>>,
    entry_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(entry_id) = entry_id?;
    let entry = app_state.db.get_entry(entry_id).await?;
    let prompts = app_state.db.get_prompt_responses(entry_id).await?;

    Ok(Json(EntryResponse {
        success: true,
        entry: EntryBody::from(entry).with_prompts(prompts),
    }))
}

/// Update the provided fields of an entry.
#[utoipa::path(
    put,
    path = "/entries/{id}",
    params(("id" = Uuid, Path, description = "Dream entry id")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Entry updated", body = EntryResponse),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn update_entry_handler(
    State(app_state): State<Arc<AppState>>,
    entry_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(entry_id) = entry_id?;
    let Json(request) = payload?;
    let patch = request.into_patch()?;

    let entry = app_state.db.update_entry(entry_id, patch).await?;

    Ok(Json(EntryResponse {
        success: true,
        entry: entry.into(),
    }))
}

/// Analyse an entry and/or illustrate it. Each step may fail on its own; the
/// entry is saved with whatever succeeded.
#[utoipa::path(
    post,
    path = "/entries/{id}/enhance",
    params(("id" = Uuid, Path, description = "Dream entry id")),
    request_body = EnhanceEntryRequest,
    responses(
        (status = 200, description = "Enhancement results", body = EnhanceEntryResponse),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn enhance_entry_handler(
    State(app_state): State<Arc<AppState>>,
    entry_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<EnhanceEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(entry_id) = entry_id?;
    let Json(request) = payload?;
    let entry = app_state.db.get_entry(entry_id).await?;
    let style = ArtStyle::parse_or_default(request.art_style.as_deref());
    let description = entry.description().map(str::to_string);

    let analysis_step = async {
        match (&description, request.analyze_content) {
            (Some(text), true) => Some(
                app_state
                    .analysis_adapter
                    .analyze_dream(text, AnalysisOptions::default())
                    .await,
            ),
            _ => None,
        }
    };
    let image_step = async {
        match (&description, request.generate_image) {
            (Some(text), true) => {
                let image_request = ImageRequest {
                    prompt: enhance_prompt(text, style, false),
                    style,
                    quality: ImageQuality::Standard,
                };
                let result = app_state.image_adapter.generate_image(&image_request).await;
                Some(result.map(|image| (image, image_request.prompt)))
            }
            _ => None,
        }
    };
    let (analysis_result, image_result) = tokio::join!(analysis_step, image_step);

    let mut patch = DreamEntryPatch::default();
    let mut analysis = None;
    let mut analysis_error = None;
    let mut image = None;
    let mut image_error = None;

    match analysis_result {
        Some(Ok(outcome)) => {
            let found = outcome.analysis;
            patch.themes = Some(found.themes.clone());
            patch.symbols = Some(found.symbols.clone());
            let mood = found.mood.trim();
            patch.emotions = Some(if mood.is_empty() {
                Vec::new()
            } else {
                vec![mood.to_string()]
            });
            analysis = Some(AnalysisBody::from(found));
        }
        Some(Err(e)) => {
            warn!("Dream analysis failed for entry {}: {}", entry_id, e);
            analysis_error = Some(e.to_string());
        }
        None => {}
    }

    match image_result {
        Some(Ok((generated, prompt))) => {
            patch.image_url = Some(generated.image_url.clone());
            patch.ai_prompt = Some(prompt.clone());
            patch.art_style = Some(style);
            image = Some(EnhancedImageBody {
                url: generated.image_url,
                prompt,
                style: style.to_string(),
            });
        }
        Some(Err(e)) => {
            warn!("Image generation failed for entry {}: {}", entry_id, e);
            image_error = Some(e.to_string());
        }
        None => {}
    }

    let entry = app_state.db.update_entry(entry_id, patch).await?;

    Ok(Json(EnhanceEntryResponse {
        success: true,
        results: EnhanceResults {
            analysis,
            analysis_error,
            image,
            image_error,
            entry: entry.into(),
        },
    }))
}
