//! System instructions and prompt construction
//!
//! A chat context label selects the persona prepended to the shopper's
//! message. Prompts are kept provider-neutral here; the conversion layer
//! reshapes them for each upstream API.

use crate::models::chat::{DescriptionRequest, Features};

const FASHION_INSTRUCTION: &str = "You are the personal style advisor for Aharyas, a fashion \
brand that works with Indian handloom artisans. Recommend garments, fabrics and styling \
based on the customer's occasion, body type and taste. Mention traditional textiles such \
as Ikkat, Kalamkari, Chanderi and Banarasi when they fit. Keep answers warm, concise and \
practical.";

const SUPPORT_INSTRUCTION: &str = "You are the customer support assistant for Aharyas. Help \
with orders, shipping, returns, sizing and garment care. Be polite and precise. If you do \
not know an order-specific detail, ask the customer to contact support with their order \
number instead of guessing.";

const GENERAL_INSTRUCTION: &str = "You are the friendly assistant of Aharyas, a fashion \
brand celebrating Indian craft heritage. Answer questions about the brand, its \
collections and its artisans briefly and helpfully.";

const DESCRIPTION_INSTRUCTION: &str = "You are a copywriter for Aharyas, a fashion brand \
rooted in Indian handloom traditions. Write an evocative product description of two short \
paragraphs that highlights craftsmanship and heritage. Do not invent prices or sizes.";

/// Persona selected by the `context` field of a chat request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatContext {
    Fashion,
    Support,
    #[default]
    General,
}

impl ChatContext {
    /// Resolve a context label; unknown or missing labels select `General`
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("fashion") => ChatContext::Fashion,
            Some("support") => ChatContext::Support,
            _ => ChatContext::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatContext::Fashion => "fashion",
            ChatContext::Support => "support",
            ChatContext::General => "general",
        }
    }

    pub fn system_instruction(&self) -> &'static str {
        match self {
            ChatContext::Fashion => FASHION_INSTRUCTION,
            ChatContext::Support => SUPPORT_INSTRUCTION,
            ChatContext::General => GENERAL_INSTRUCTION,
        }
    }
}

/// Provider-neutral prompt: a system instruction plus the user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Single text blob for providers without a separate system role
    pub fn combined(&self) -> String {
        if self.system.trim().is_empty() {
            return self.user.clone();
        }
        format!("{}\n\nUser: {}", self.system, self.user)
    }
}

/// Build the prompt for a chat message
pub fn chat_prompt(context: ChatContext, message: &str) -> Prompt {
    Prompt {
        system: context.system_instruction().to_string(),
        user: message.trim().to_string(),
    }
}

/// Build the copywriting prompt for a product description
///
/// Optional fields that are absent or blank are left out entirely.
pub fn description_prompt(request: &DescriptionRequest) -> Prompt {
    let mut lines = vec![format!("Product name: {}", request.product_name.trim())];

    let features = match &request.features {
        Some(Features::List(items)) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(Features::Text(text)) => text.trim().to_string(),
        None => String::new(),
    };
    if !features.is_empty() {
        lines.push(format!("Key features: {}", features));
    }

    for (label, value) in [("Category", &request.category), ("Heritage", &request.heritage)] {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            lines.push(format!("{}: {}", label, value));
        }
    }

    Prompt {
        system: DESCRIPTION_INSTRUCTION.to_string(),
        user: lines.join("\n"),
    }
}
