//! Provider abstraction layer for generative-text APIs
//!
//! Every upstream (Gemini, OpenAI) is wrapped in a strategy implementing the
//! same `attempt` contract so the orchestrator can walk them in order.

use crate::core::prompts::Prompt;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ProviderError {
    /// Map a non-success HTTP status and its classified body to an error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ProviderError::Authentication(message),
            429 => ProviderError::RateLimit(message),
            400 | 404 => ProviderError::BadRequest(message),
            _ => ProviderError::ApiError { status, message },
        }
    }

    /// Map a transport-level reqwest failure
    pub fn from_transport(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else {
            ProviderError::Unexpected(error.to_string())
        }
    }
}

/// A single upstream generative-text service
#[async_trait]
pub trait Provider: Send + Sync {
    /// Ask the upstream for a completion of `prompt` and return its text
    async fn attempt(&self, prompt: &Prompt) -> Result<String, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    Gemini,
    OpenAI,
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderType::Gemini),
            "openai" => Ok(ProviderType::OpenAI),
            other => Err(format!(
                "unknown provider '{}', expected one of: gemini, openai",
                other
            )),
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Gemini => write!(f, "gemini"),
            ProviderType::OpenAI => write!(f, "openai"),
        }
    }
}
