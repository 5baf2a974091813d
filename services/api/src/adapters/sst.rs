//! services/api/src/adapters/sst.rs
//!
//! This module contains the adapter for OpenAI's Speech-to-Text (Whisper) service.
//! It implements the `SpeechToTextService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::audio::{AudioInput, AudioResponseFormat, CreateTranscriptionRequest},
    Client,
};
use async_trait::async_trait;
use dream_journal_core::{
    domain::Transcription,
    ports::{PortError, PortResult, SpeechToTextService},
    pricing::transcription_cost,
};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `SpeechToTextService` port using the OpenAI Whisper API.
#[derive(Clone)]
pub struct OpenAiSstAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSstAdapter {
    /// Creates a new `OpenAiSstAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `SpeechToTextService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SpeechToTextService for OpenAiSstAdapter {
    /// Transcribes an uploaded recording. The verbose response carries the
    /// audio duration, which drives the cost estimate.
    async fn transcribe_audio(&self, file_name: &str, audio_data: Vec<u8>) -> PortResult<Transcription> {
        let input = AudioInput::from_vec_u8(file_name.to_string(), audio_data);

        let request = CreateTranscriptionRequest {
            file: input,
            model: self.model.clone(),
            response_format: Some(AudioResponseFormat::VerboseJson),
            language: Some("en".to_string()),
            ..Default::default()
        };

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .audio()
            .transcription()
            .create_verbose_json(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        let duration_seconds = f64::from(response.duration);
        let cost = transcription_cost(duration_seconds);
        info!(
            "Transcription completed: {:.1}s audio, ${:.4}",
            duration_seconds, cost
        );

        Ok(Transcription {
            text: response.text,
            duration_seconds,
            cost,
        })
    }
}
