//! Storefront API data models
//!
//! Bodies accepted and returned by `/api/chat` and
//! `/api/generate-description`.

use serde::{Deserialize, Serialize};

/// Chat request from the storefront chat-bot
///
/// `message` defaults to empty so a missing field is reported as a
/// validation failure rather than a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Envelope returned by `/api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Product features arrive either as a list or as free text
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Features {
    List(Vec<String>),
    Text(String),
}

/// Request body for `/api/generate-description`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub features: Option<Features>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub heritage: Option<String>,
}

/// Envelope returned by `/api/generate-description`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescriptionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
