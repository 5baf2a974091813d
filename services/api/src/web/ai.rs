//! services/api/src/web/ai.rs
//!
//! Handlers that front the paid AI collaborators, plus the static style
//! catalogue and pricing table.

use crate::error::ApiError;
use crate::web::rest::AnalysisBody;
use crate::web::state::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, State,
    },
    response::IntoResponse,
    Json,
};
use dream_journal_core::{
    pricing::{
        ANALYSIS_INPUT_COST_PER_1K, ANALYSIS_OUTPUT_COST_PER_1K, IMAGE_HD_COST,
        IMAGE_STANDARD_COST, TRANSCRIPTION_COST_PER_MINUTE,
    },
    styles::enhance_prompt,
    validation::{validate_audio_upload, validate_dream_text},
    AnalysisOptions, ArtStyle, ImageQuality, ImageRequest, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

/// Name of the multipart field that carries the recording.
const AUDIO_FIELD: &str = "audio";

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct TranscriptionResponse {
    success: bool,
    text: String,
    duration: f64,
    cost_estimate: f64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeDreamRequest {
    #[serde(default)]
    pub dream_text: Option<String>,
    #[serde(default = "default_true")]
    pub include_symbolism: bool,
    #[serde(default = "default_true")]
    pub include_emotions: bool,
}

#[derive(Serialize, ToSchema)]
pub struct AnalyzeDreamResponse {
    success: bool,
    analysis: AnalysisBody,
    tokens_used: u32,
    cost_estimate: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct GenerateImageRequest {
    pub dream_text: Option<String>,
    pub style: Option<String>,
    pub quality: Option<String>,
    /// Reference images of people who appear in the dream.
    pub character_images: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct GenerateImageResponse {
    success: bool,
    image_url: String,
    enhanced_prompt: String,
    revised_prompt: String,
    style: String,
    quality: String,
    cost_estimate: f64,
    generation_time: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct EnhancePromptRequest {
    pub dream_text: Option<String>,
    pub style: Option<String>,
    pub character_references: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EnhancePromptResponse {
    success: bool,
    original_prompt: String,
    enhanced_prompt: String,
    style: String,
}

#[derive(Serialize, ToSchema)]
pub struct StyleBody {
    id: String,
    name: String,
    description: String,
}

#[derive(Serialize, ToSchema)]
pub struct StylesResponse {
    styles: Vec<StyleBody>,
}

fn required_dream_text(dream_text: Option<String>) -> Result<String, ValidationError> {
    let text = dream_text.ok_or(ValidationError::Required { field: "dream_text" })?;
    validate_dream_text("dream_text", &text)?;
    Ok(text)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Transcribe a recorded dream.
///
/// Accepts a multipart/form-data request with an `audio` file part.
#[utoipa::path(
    post,
    path = "/ai/speech-to-text",
    request_body(content_type = "multipart/form-data", description = "The recording, in the `audio` part."),
    responses(
        (status = 200, description = "Transcribed text", body = TranscriptionResponse),
        (status = 400, description = "Missing or invalid audio file"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Transcription failed")
    )
)]
pub async fn speech_to_text_handler(
    State(app_state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("recording.m4a").to_string();
        let data = field.bytes().await?;
        upload = Some((file_name, data));
        break;
    }
    let (file_name, data) =
        upload.ok_or_else(|| ApiError::BadRequest("No audio data provided".to_string()))?;
    validate_audio_upload(&file_name, data.len())?;

    let transcription = app_state
        .sst_adapter
        .transcribe_audio(&file_name, data.to_vec())
        .await?;
    if app_state.config.track_api_costs {
        info!(
            "Transcription completed: {:.1} seconds, ${:.4}",
            transcription.duration_seconds, transcription.cost
        );
    }

    Ok(Json(TranscriptionResponse {
        success: true,
        text: transcription.text,
        duration: transcription.duration_seconds,
        cost_estimate: transcription.cost,
    }))
}

/// Analyse dream text for mood, themes and symbols.
#[utoipa::path(
    post,
    path = "/ai/analyze-dream",
    request_body = AnalyzeDreamRequest,
    responses(
        (status = 200, description = "Structured analysis", body = AnalyzeDreamResponse),
        (status = 400, description = "Missing or invalid dream text"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Analysis failed")
    )
)]
pub async fn analyze_dream_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeDreamRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let dream_text = required_dream_text(request.dream_text)?;
    let options = AnalysisOptions {
        include_symbolism: request.include_symbolism,
        include_emotions: request.include_emotions,
    };

    let outcome = app_state
        .analysis_adapter
        .analyze_dream(&dream_text, options)
        .await?;
    if app_state.config.track_api_costs {
        info!(
            "Dream analysed: {} tokens, ${:.4}",
            outcome.tokens_used, outcome.cost
        );
    }

    Ok(Json(AnalyzeDreamResponse {
        success: true,
        analysis: outcome.analysis.into(),
        tokens_used: outcome.tokens_used,
        cost_estimate: outcome.cost,
    }))
}

/// Illustrate dream text in one of the art styles.
#[utoipa::path(
    post,
    path = "/ai/generate-image",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Generated image", body = GenerateImageResponse),
        (status = 400, description = "Missing or invalid dream text"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Image generation failed")
    )
)]
pub async fn generate_image_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let dream_text = required_dream_text(request.dream_text)?;
    let style = ArtStyle::parse_or_default(request.style.as_deref());
    let quality = ImageQuality::parse_or_default(request.quality.as_deref());

    let image_request = ImageRequest {
        prompt: enhance_prompt(&dream_text, style, !request.character_images.is_empty()),
        style,
        quality,
    };
    let image = app_state.image_adapter.generate_image(&image_request).await?;
    if app_state.config.track_api_costs {
        info!("Image generated: {} quality, style: {}", quality, style);
    }

    Ok(Json(GenerateImageResponse {
        success: true,
        image_url: image.image_url,
        enhanced_prompt: image_request.prompt,
        revised_prompt: image.revised_prompt,
        style: style.to_string(),
        quality: quality.to_string(),
        cost_estimate: image.cost,
        generation_time: image.generation_time_seconds,
    }))
}

/// Preview the prompt that would be sent for image generation.
#[utoipa::path(
    post,
    path = "/ai/enhance-prompt",
    request_body = EnhancePromptRequest,
    responses(
        (status = 200, description = "Enhanced prompt", body = EnhancePromptResponse),
        (status = 400, description = "Missing or invalid dream text")
    )
)]
pub async fn enhance_prompt_handler(
    payload: Result<Json<EnhancePromptRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let dream_text = required_dream_text(request.dream_text)?;
    let style = ArtStyle::parse_or_default(request.style.as_deref());
    let enhanced_prompt =
        enhance_prompt(&dream_text, style, !request.character_references.is_empty());

    Ok(Json(EnhancePromptResponse {
        success: true,
        original_prompt: dream_text,
        enhanced_prompt,
        style: style.to_string(),
    }))
}

/// The art style catalogue.
#[utoipa::path(
    get,
    path = "/ai/styles",
    responses((status = 200, description = "Available art styles", body = StylesResponse))
)]
pub async fn list_styles_handler() -> impl IntoResponse {
    let styles = ArtStyle::ALL
        .into_iter()
        .map(|style| StyleBody {
            id: style.as_str().to_string(),
            name: style.display_name().to_string(),
            description: style.description().to_string(),
        })
        .collect();
    Json(StylesResponse { styles })
}

/// Current pricing for the AI operations, in USD.
#[utoipa::path(
    get,
    path = "/ai/costs",
    responses((status = 200, description = "Pricing table"))
)]
pub async fn list_costs_handler(State(app_state): State<Arc<AppState>>) -> Json<Value> {
    let config = &app_state.config;
    Json(json!({
        "speech_to_text": {
            "provider": "OpenAI Whisper",
            "model": config.whisper_model,
            "cost_per_minute": TRANSCRIPTION_COST_PER_MINUTE,
            "currency": "USD",
            "notes": "Billed per second"
        },
        "image_generation": {
            "provider": "OpenAI DALL-E 3",
            "model": config.image_model,
            "costs": {
                "standard_1024x1024": IMAGE_STANDARD_COST,
                "hd_1024x1024": IMAGE_HD_COST
            },
            "currency": "USD"
        },
        "text_processing": {
            "provider": "OpenAI GPT-4",
            "model": config.analysis_model,
            "costs": {
                "input_per_1k_tokens": ANALYSIS_INPUT_COST_PER_1K,
                "output_per_1k_tokens": ANALYSIS_OUTPUT_COST_PER_1K
            },
            "currency": "USD"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn dream_text_must_be_present() {
        assert_matches!(
            required_dream_text(None),
            Err(ValidationError::Required { field: "dream_text" })
        );
        assert_matches!(
            required_dream_text(Some("  ".into())),
            Err(ValidationError::Blank { field: "dream_text" })
        );
        assert_eq!(required_dream_text(Some("I flew".into())).unwrap(), "I flew");
    }

    #[test]
    fn analysis_flags_default_on() {
        let request: AnalyzeDreamRequest = serde_json::from_str(r#"{"dream_text":"x"}"#).unwrap();
        assert!(request.include_symbolism);
        assert!(request.include_emotions);
    }
}
