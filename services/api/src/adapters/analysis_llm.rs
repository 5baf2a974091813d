//! services/api/src/adapters/analysis_llm.rs
//!
//! This module contains the adapter for the dream-analysis LLM.
//! It implements the `DreamAnalysisService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use dream_journal_core::{
    domain::{AnalysisOptions, AnalysisOutcome, DreamAnalysis},
    ports::{DreamAnalysisService, PortError, PortResult},
    pricing::analysis_cost,
};
use serde::Deserialize;
use tracing::info;

const SYSTEM_INSTRUCTIONS: &str = "You are a thoughtful dream analyst. Analyze the dream and provide \
insights in JSON format. Be encouraging and insightful, avoiding negative interpretations.";

const USER_INPUT_TEMPLATE: &str = r#"Analyze this dream and provide insights:

Dream: {dream}

Provide a JSON response with:
{
    "mood": "The overall emotional tone",
    "themes": ["array", "of", "3-5", "main", "themes"],
    "symbols": ["array", "of", "key", "symbolic", "elements"],
    "interpretation": "A thoughtful 2-3 sentence interpretation",
    "emotional_tone": "Brief description of the emotional undertone",
    "personal_growth": "How this dream might relate to personal growth"
}{extra}"#;

/// The JSON object the model is asked to return. Missing keys default to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalysisPayload {
    mood: String,
    themes: Vec<String>,
    symbols: Vec<String>,
    interpretation: String,
    emotional_tone: String,
    personal_growth: String,
}

impl AnalysisPayload {
    fn to_domain(self) -> DreamAnalysis {
        DreamAnalysis {
            mood: self.mood,
            themes: self.themes,
            symbols: self.symbols,
            interpretation: self.interpretation,
            emotional_tone: self.emotional_tone,
            personal_growth: self.personal_growth,
        }
    }
}

fn build_user_input(dream_text: &str, options: AnalysisOptions) -> String {
    let mut extra = String::new();
    if !options.include_symbolism {
        extra.push_str("\n\nKeep the symbols list empty.");
    }
    if !options.include_emotions {
        extra.push_str("\n\nKeep the emotional_tone brief and do not dwell on emotions.");
    }
    USER_INPUT_TEMPLATE
        .replace("{dream}", dream_text)
        .replace("{extra}", &extra)
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `DreamAnalysisService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `DreamAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DreamAnalysisService for OpenAiAnalysisAdapter {
    async fn analyze_dream(
        &self,
        dream_text: &str,
        options: AnalysisOptions,
    ) -> PortResult<AnalysisOutcome> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(build_user_input(dream_text, options))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .max_tokens(500u32)
            .temperature(0.7)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Upstream("Dream analysis response contained no text content.".to_string())
            })?;

        let payload: AnalysisPayload = serde_json::from_str(&content).map_err(|e| {
            PortError::Upstream(format!("Dream analysis was not valid JSON: {}", e))
        })?;

        let (prompt_tokens, completion_tokens, tokens_used) = response
            .usage
            .map(|usage| (usage.prompt_tokens, usage.completion_tokens, usage.total_tokens))
            .unwrap_or_default();
        let cost = analysis_cost(prompt_tokens, completion_tokens);
        info!("Dream analysis completed: {} tokens, ${:.4}", tokens_used, cost);

        Ok(AnalysisOutcome {
            analysis: payload.to_domain(),
            tokens_used,
            cost,
        })
    }
}
