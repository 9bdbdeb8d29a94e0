// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini adapter for the generation and image collaborators.
//!
//! [`GeminiProvider`] implements [`GenerationProvider`] (JSON quiz records
//! with a declared response schema) and [`ImageProvider`] (inline base64
//! images returned as `data:` URIs).

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use tracing::debug;

use quizfeed_config::model::GeminiConfig;
use quizfeed_core::{
    AdapterType, FeedError, GenerationProvider, GenerationRequest, HealthStatus, ImageProvider,
    ImageRequest, PluginAdapter,
};

pub use client::GeminiClient;
use types::{
    response_schema, Content, GenerateContentRequest, GenerationConfig, ImageConfig,
    ThinkingConfig,
};

/// Gemini-backed generation and image provider.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
    text_model: String,
    image_model: String,
}

impl GeminiProvider {
    /// Creates a provider from config, resolving the API key.
    pub fn new(config: &GeminiConfig) -> Result<Self, FeedError> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            FeedError::Config(
                "Gemini API key not set: use gemini.api_key, QUIZFEED_GEMINI_API_KEY or GEMINI_API_KEY"
                    .into(),
            )
        })?;
        let client = GeminiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::with_client(
            client,
            config.text_model.clone(),
            config.image_model.clone(),
        ))
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: GeminiClient, text_model: String, image_model: String) -> Self {
        Self {
            client,
            text_model,
            image_model,
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedError> {
        // Construction already required a key; no network call.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FeedError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, FeedError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user_text(request.prompt.clone())],
            system_instruction: request.system_instruction.clone().map(Content::text),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(response_schema(request.shape)),
                thinking_config: Some(ThinkingConfig { thinking_budget: 0 }),
                image_config: None,
            }),
        };

        let response = self.client.generate_content(&self.text_model, &body).await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(FeedError::TerminalRemote {
                status: None,
                message: format!("request blocked by safety filter: {reason}"),
                source: None,
            });
        }

        let text = response.text();
        debug!(bytes = text.len(), "generation text received");
        Ok(text)
    }
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, FeedError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user_text(request.description.clone())],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: request.aspect_ratio.clone(),
                }),
                ..Default::default()
            }),
        };

        let response = self.client.generate_content(&self.image_model, &body).await?;
        let inline = response.inline_data().ok_or_else(|| {
            FeedError::NoImageProduced("response contained no inline image".into())
        })?;

        if inline.data.is_empty() {
            return Err(FeedError::NoImageProduced("inline image was empty".into()));
        }
        base64::engine::general_purpose::STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| FeedError::NoImageProduced(format!("inline image is not base64: {e}")))?;

        let mime = if inline.mime_type.is_empty() {
            "image/png"
        } else {
            inline.mime_type.as_str()
        };
        Ok(format!("data:{mime};base64,{}", inline.data))
    }
}
