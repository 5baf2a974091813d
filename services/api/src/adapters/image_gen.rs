//! services/api/src/adapters/image_gen.rs
//!
//! This module contains the adapter for OpenAI's image generation (DALL-E) service.
//! It implements the `ImageGenerationService` port from the `core` crate.

use std::time::Instant;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::images::{
        CreateImageRequestArgs, Image, ImageModel, ImageQuality as OpenAiImageQuality,
        ImageResponseFormat, ImageSize, ImageStyle,
    },
    Client,
};
use async_trait::async_trait;
use dream_journal_core::{
    domain::{GeneratedImage, ImageRequest},
    ports::{ImageGenerationService, PortError, PortResult},
    pricing::image_cost,
    ImageQuality,
};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `ImageGenerationService` port using the OpenAI Images API.
#[derive(Clone)]
pub struct OpenAiImageAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiImageAdapter {
    /// Creates a new `OpenAiImageAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn image_model(&self) -> ImageModel {
        match self.model.as_str() {
            "dall-e-3" => ImageModel::DallE3,
            "dall-e-2" => ImageModel::DallE2,
            other => ImageModel::Other(other.to_string()),
        }
    }
}

fn provider_quality(quality: ImageQuality) -> OpenAiImageQuality {
    match quality {
        ImageQuality::Standard => OpenAiImageQuality::Standard,
        ImageQuality::Hd => OpenAiImageQuality::HD,
    }
}

//=========================================================================================
// `ImageGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageGenerationService for OpenAiImageAdapter {
    async fn generate_image(&self, request: &ImageRequest) -> PortResult<GeneratedImage> {
        let started = Instant::now();

        let api_request = CreateImageRequestArgs::default()
            .prompt(request.prompt.clone())
            .model(self.image_model())
            .n(1)
            .size(ImageSize::S1024x1024)
            .quality(provider_quality(request.quality))
            .style(ImageStyle::Vivid)
            .response_format(ImageResponseFormat::Url)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .images()
            .generate(api_request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        let (image_url, revised_prompt) = match response.data.first().map(|image| image.as_ref()) {
            Some(Image::Url {
                url,
                revised_prompt,
            }) => (
                url.clone(),
                revised_prompt.clone().unwrap_or_else(|| request.prompt.clone()),
            ),
            Some(_) => {
                return Err(PortError::Upstream(
                    "Image service returned inline data instead of a URL.".to_string(),
                ))
            }
            None => {
                return Err(PortError::Upstream(
                    "Image service returned no images.".to_string(),
                ))
            }
        };

        let cost = image_cost(request.quality);
        let generation_time_seconds = started.elapsed().as_secs_f64();
        info!(
            "Image generated: {} {} style, ${:.3}, {:.2}s",
            request.quality, request.style, cost, generation_time_seconds
        );

        Ok(GeneratedImage {
            image_url,
            revised_prompt,
            cost,
            generation_time_seconds,
        })
    }
}
