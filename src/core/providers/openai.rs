//! OpenAI provider implementation

use crate::conversion::request_converter::{GenerationParams, convert_prompt_to_openai};
use crate::conversion::response_converter::convert_openai_to_text;
use crate::core::config::ProviderSettings;
use crate::core::prompts::Prompt;
use crate::core::provider::{Provider, ProviderError};
use crate::models::openai::OpenAIChatCompletionResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// OpenAI chat completions provider
pub struct OpenAIProvider {
    client: Client,
    settings: ProviderSettings,
    params: GenerationParams,
    timeout_secs: u64,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    ///
    /// * `settings` - API key, base URL and model
    /// * `params` - Sampling parameters sent with every request
    /// * `timeout` - Request timeout in seconds
    pub fn new(
        settings: ProviderSettings,
        params: GenerationParams,
        timeout: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ProviderError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            settings,
            params,
            timeout_secs: timeout,
        })
    }

    /// Classify OpenAI errors and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("unsupported_country_region_territory")
            || error_lower.contains("country, region, or territory not supported")
        {
            return "OpenAI API is not available in this region.".to_string();
        }

        if error_lower.contains("invalid_api_key") || error_lower.contains("incorrect api key") {
            return "Invalid API key. Please check your OPENAI_API_KEY configuration.".to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("quota") {
            return "Rate limit exceeded. Please wait and try again, or upgrade your API plan."
                .to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found") || error_lower.contains("does not exist"))
        {
            return "Model not found. Please check the [openai] model setting.".to_string();
        }

        error_detail.to_string()
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn attempt(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let request = convert_prompt_to_openai(prompt, &self.settings.model, self.params);
        debug!(model = %self.settings.model, "Sending OpenAI chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(e, self.timeout_secs))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::from_status(
                status.as_u16(),
                Self::classify_error(&error_text),
            ));
        }

        let completion: OpenAIChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                id = completion.id.as_deref().unwrap_or("-"),
                model = completion.model.as_deref().unwrap_or("-"),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "OpenAI usage"
            );
        }

        convert_openai_to_text(&completion).ok_or_else(|| {
            let finish_reason = completion
                .choices
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            ProviderError::InvalidResponse(format!(
                "OpenAI returned no text (finish_reason: {})",
                finish_reason
            ))
        })
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
