//! AI response orchestration
//!
//! The orchestrator owns the ordered list of provider strategies and walks it
//! once per request: the first provider to return text wins, each failure is
//! logged and the next provider is tried. There are no retries; a provider is
//! called at most once per request.

use crate::conversion::request_converter::GenerationParams;
use crate::core::config::Config;
use crate::core::prompts::{self, ChatContext, Prompt};
use crate::core::provider::{Provider, ProviderError, ProviderType};
use crate::core::providers::{GeminiProvider, OpenAIProvider};
use crate::models::chat::DescriptionRequest;
use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Failures surfaced to the HTTP layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("All AI providers failed: {0}")]
    UpstreamUnavailable(String),
}

/// Position of the serving provider in the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceProvider {
    Primary,
    Secondary,
}

impl SourceProvider {
    fn from_rank(rank: usize) -> Self {
        if rank == 0 {
            SourceProvider::Primary
        } else {
            SourceProvider::Secondary
        }
    }
}

impl fmt::Display for SourceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceProvider::Primary => write!(f, "primary"),
            SourceProvider::Secondary => write!(f, "secondary"),
        }
    }
}

/// Reply text and which link of the chain produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub text: String,
    pub source_provider: SourceProvider,
}

/// Walks the configured providers in order until one answers
pub struct Orchestrator {
    providers: Vec<Arc<dyn Provider>>,
}

impl Orchestrator {
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Build the provider chain described by `config.provider_order`
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let params = GenerationParams {
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
        };

        let providers = config
            .provider_order
            .iter()
            .map(|kind| -> Result<Arc<dyn Provider>, ProviderError> {
                let settings = config.settings(*kind).clone();
                let provider: Arc<dyn Provider> = match kind {
                    ProviderType::Gemini => Arc::new(GeminiProvider::new(
                        settings,
                        params,
                        config.request_timeout,
                    )?),
                    ProviderType::OpenAI => Arc::new(OpenAIProvider::new(
                        settings,
                        params,
                        config.request_timeout,
                    )?),
                };
                Ok(provider)
            })
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to initialize AI providers")?;

        Ok(Self::new(providers))
    }

    /// Providers in fallback order
    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    /// Get a chat reply for `message` in the persona selected by `context`
    ///
    /// Unknown context labels use the general persona.
    ///
    /// # Errors
    ///
    /// `ChatError::Validation` for a blank message (no provider is called),
    /// `ChatError::UpstreamUnavailable` when every provider fails.
    pub async fn get_reply(
        &self,
        message: &str,
        context: Option<&str>,
    ) -> Result<ProviderResponse, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::Validation("message must not be empty".to_string()));
        }

        let context = ChatContext::from_label(context);
        let prompt = prompts::chat_prompt(context, message);
        self.generate(&prompt).await
    }

    /// Write a product description
    ///
    /// # Errors
    ///
    /// `ChatError::Validation` for a blank product name,
    /// `ChatError::UpstreamUnavailable` when every provider fails.
    pub async fn describe_product(
        &self,
        request: &DescriptionRequest,
    ) -> Result<ProviderResponse, ChatError> {
        if request.product_name.trim().is_empty() {
            return Err(ChatError::Validation(
                "productName must not be empty".to_string(),
            ));
        }

        let prompt = prompts::description_prompt(request);
        self.generate(&prompt).await
    }

    /// Run `prompt` through the fallback chain
    pub async fn generate(&self, prompt: &Prompt) -> Result<ProviderResponse, ChatError> {
        let mut last_error = "no AI providers configured".to_string();

        for (rank, provider) in self.providers.iter().enumerate() {
            let source = SourceProvider::from_rank(rank);

            match provider.attempt(prompt).await {
                Ok(text) => {
                    info!(
                        provider = provider.provider_name(),
                        source = %source,
                        "AI reply received"
                    );
                    return Ok(ProviderResponse {
                        text,
                        source_provider: source,
                    });
                }
                Err(e) => {
                    warn!(
                        provider = provider.provider_name(),
                        source = %source,
                        error = %e,
                        "AI provider failed"
                    );
                    last_error = format!("{}: {}", provider.provider_name(), e);
                }
            }
        }

        Err(ChatError::UpstreamUnavailable(last_error))
    }
}
