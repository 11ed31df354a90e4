//! Prompt to upstream request conversion
//!
//! Gemini has no system role on `generateContent` for every model, so the
//! system instruction and the user turn travel as one text part. OpenAI gets a
//! structured messages array instead.

use crate::core::constants::role;
use crate::core::prompts::Prompt;
use crate::models::gemini::{GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest};
use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIMessage};

/// Sampling parameters shared by both upstreams
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Convert a prompt to a Gemini `generateContent` request
pub fn convert_prompt_to_gemini(prompt: &Prompt, params: GenerationParams) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some(role::USER.to_string()),
            parts: vec![GeminiPart {
                text: Some(prompt.combined()),
            }],
        }],
        generation_config: Some(GeminiGenerationConfig {
            temperature: Some(params.temperature),
            max_output_tokens: Some(params.max_output_tokens),
        }),
    }
}

/// Convert a prompt to an OpenAI chat completion request
pub fn convert_prompt_to_openai(
    prompt: &Prompt,
    model: &str,
    params: GenerationParams,
) -> OpenAIChatCompletionRequest {
    let mut messages = Vec::with_capacity(2);

    if !prompt.system.trim().is_empty() {
        messages.push(OpenAIMessage {
            role: role::SYSTEM.to_string(),
            content: Some(prompt.system.clone()),
        });
    }

    messages.push(OpenAIMessage {
        role: role::USER.to_string(),
        content: Some(prompt.user.clone()),
    });

    OpenAIChatCompletionRequest {
        model: model.to_string(),
        messages,
        max_tokens: Some(params.max_output_tokens),
        temperature: Some(params.temperature),
    }
}
