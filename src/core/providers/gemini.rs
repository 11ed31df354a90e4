//! Gemini provider implementation

use crate::conversion::request_converter::{GenerationParams, convert_prompt_to_gemini};
use crate::conversion::response_converter::convert_gemini_to_text;
use crate::core::config::ProviderSettings;
use crate::core::prompts::Prompt;
use crate::core::provider::{Provider, ProviderError};
use crate::models::gemini::GeminiResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Gemini provider for Google's generative language API
pub struct GeminiProvider {
    client: Client,
    settings: ProviderSettings,
    params: GenerationParams,
    timeout_secs: u64,
}

impl GeminiProvider {
    /// Create a new Gemini provider
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

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        )
    }

    /// Classify Gemini errors
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("api_key_invalid") || error_lower.contains("api key not valid") {
            return "Invalid API key. Please check your GEMINI_API_KEY configuration.".to_string();
        }

        if error_lower.contains("resource_exhausted") || error_lower.contains("quota") {
            return "Rate limit or quota exceeded for the Gemini API.".to_string();
        }

        if error_lower.contains("model") && error_lower.contains("not found") {
            return "Model not found. Please check the [gemini] model setting.".to_string();
        }

        if error_lower.contains("user location is not supported") {
            return "Gemini API is not available in this region.".to_string();
        }

        error_detail.to_string()
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn attempt(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let request = convert_prompt_to_gemini(prompt, self.params);
        debug!(model = %self.settings.model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(self.endpoint_url())
            .header("x-goog-api-key", &self.settings.api_key)
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

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                candidate_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Gemini usage"
            );
        }

        convert_gemini_to_text(&body).ok_or_else(|| {
            let finish_reason = body
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            ProviderError::InvalidResponse(format!(
                "Gemini returned no text (finishReason: {})",
                finish_reason
            ))
        })
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, http::Uri, response::IntoResponse};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Seen {
        path: Option<String>,
        api_key: Option<String>,
        body: Option<Value>,
    }

    /// Spawn a local upstream answering every request with `status` and `body`
    async fn spawn_upstream(status: StatusCode, body: Value) -> (String, Arc<Mutex<Seen>>) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let recorder = seen.clone();

        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, Json(request): Json<Value>| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                let mut seen = recorder.lock().unwrap();
                seen.path = Some(uri.path().to_string());
                seen.api_key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                seen.body = Some(request);
                (status, Json(body)).into_response()
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }

    fn provider(base_url: String) -> GeminiProvider {
        GeminiProvider::new(
            ProviderSettings {
                api_key: "gemini-test-key".to_string(),
                base_url,
                model: "gemini-test".to_string(),
            },
            GenerationParams {
                max_output_tokens: 100,
                temperature: 0.5,
            },
            5,
        )
        .unwrap()
    }

    fn prompt() -> Prompt {
        Prompt {
            system: "Be brief.".to_string(),
            user: "Is Chanderi light?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_attempt_returns_candidate_text() {
        let (url, seen) = spawn_upstream(
            StatusCode::OK,
            json!({"candidates": [{"content": {"role": "model", "parts": [{"text": "Yes, very light."}]}}]}),
        )
        .await;

        let text = provider(url).attempt(&prompt()).await.unwrap();
        assert_eq!(text, "Yes, very light.");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.path.as_deref(), Some("/models/gemini-test:generateContent"));
        assert_eq!(seen.api_key.as_deref(), Some("gemini-test-key"));
        let body = seen.body.as_ref().unwrap();
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Be brief.\n\nUser: Is Chanderi light?"
        );
    }

    #[tokio::test]
    async fn test_attempt_maps_error_status() {
        let (url, _) = spawn_upstream(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": {"status": "RESOURCE_EXHAUSTED"}}),
        )
        .await;

        let err = provider(url).attempt(&prompt()).await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimit(_)));
    }

    #[tokio::test]
    async fn test_attempt_rejects_empty_candidates() {
        let (url, _) = spawn_upstream(StatusCode::OK, json!({"candidates": []})).await;

        let err = provider(url).attempt(&prompt()).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_attempt_reports_unreachable_upstream() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(format!("http://{}", addr))
            .attempt(&prompt())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unexpected(_)));
    }

    #[test]
    fn test_classify_invalid_key() {
        let result = GeminiProvider::classify_error("API key not valid. Please pass a valid API key.");
        assert!(result.contains("GEMINI_API_KEY"));
    }
}
