//! services/api/src/web/prompts.rs
//!
//! Follow-up prompt suggestions and answered-prompt storage.

use crate::error::ApiError;
use crate::web::rest::PromptResponseBody;
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dream_journal_core::{select_follow_up_prompts, NewPromptResponse, ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AnsweredPrompt {
    pub prompt_text: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct GeneratePromptsRequest {
    pub dream_text: String,
    pub current_responses: Vec<AnsweredPrompt>,
}

#[derive(Serialize, ToSchema)]
pub struct GeneratePromptsResponse {
    success: bool,
    prompts: Vec<String>,
    suggested_order: Vec<usize>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreatePromptResponseRequest {
    pub dream_entry_id: Option<Uuid>,
    pub prompt_text: Option<String>,
    pub response_transcription: Option<String>,
    pub prompt_order: i32,
}

#[derive(Serialize, ToSchema)]
pub struct PromptResponseEnvelope {
    success: bool,
    prompt: PromptResponseBody,
}

impl CreatePromptResponseRequest {
    pub fn into_new_response(self) -> Result<NewPromptResponse, ValidationError> {
        let dream_entry_id = self.dream_entry_id.ok_or(ValidationError::Required {
            field: "dream_entry_id",
        })?;
        let prompt_text = self.prompt_text.ok_or(ValidationError::Required {
            field: "prompt_text",
        })?;
        if prompt_text.trim().is_empty() {
            return Err(ValidationError::Blank {
                field: "prompt_text",
            });
        }
        Ok(NewPromptResponse {
            dream_entry_id,
            prompt_text,
            response_transcription: self.response_transcription,
            prompt_order: self.prompt_order,
        })
    }
}

/// Suggest up to three follow-up questions from categories not yet explored.
#[utoipa::path(
    post,
    path = "/prompts/generate",
    request_body = GeneratePromptsRequest,
    responses(
        (status = 200, description = "Suggested prompts", body = GeneratePromptsResponse),
        (status = 400, description = "Malformed body")
    )
)]
pub async fn generate_prompts_handler(
    payload: Result<Json<GeneratePromptsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let answered: Vec<&str> = request
        .current_responses
        .iter()
        .map(|response| response.prompt_text.as_str())
        .collect();

    let prompts: Vec<String> = select_follow_up_prompts(&answered)
        .into_iter()
        .map(str::to_string)
        .collect();
    debug!(
        "Selected {} follow-up prompts after {} answers",
        prompts.len(),
        answered.len()
    );

    Ok(Json(GeneratePromptsResponse {
        success: true,
        suggested_order: (0..prompts.len()).collect(),
        prompts,
    }))
}

/// Store the answer to a follow-up prompt.
#[utoipa::path(
    post,
    path = "/prompts",
    request_body = CreatePromptResponseRequest,
    responses(
        (status = 201, description = "Prompt response stored", body = PromptResponseEnvelope),
        (status = 400, description = "Missing dream_entry_id or prompt_text"),
        (status = 404, description = "Dream entry not found")
    )
)]
pub async fn create_prompt_response_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreatePromptResponseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let new_response = request.into_new_response()?;

    // Surfaces a clean 404 before the insert.
    app_state.db.get_entry(new_response.dream_entry_id).await?;
    let prompt = app_state.db.create_prompt_response(new_response).await?;

    Ok((
        StatusCode::CREATED,
        Json(PromptResponseEnvelope {
            success: true,
            prompt: prompt.into(),
        }),
    ))
}
