//! Constants for upstream API role names, endpoints and defaults
//!
//! String constants shared between the conversion layer and the provider
//! strategies.

/// Message role constants
pub mod role {
    /// User role identifier (both APIs)
    pub const USER: &str = "user";

    /// System role identifier (OpenAI)
    pub const SYSTEM: &str = "system";
}

/// Default upstream endpoints and models
pub mod upstream {
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const GEMINI_MODEL: &str = "gemini-1.5-flash";
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";
}

/// Environment variables consulted for provider credentials
pub mod env {
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const CONFIG_PATH: &str = "CONFIG_PATH";
}

/// User-facing messages returned by the HTTP surface
pub mod message {
    pub const MESSAGE_REQUIRED: &str = "Message is required";
    pub const PRODUCT_NAME_REQUIRED: &str = "Product name is required";
    pub const CHAT_FAILED: &str = "Failed to get AI response";
    pub const DESCRIPTION_FAILED: &str = "Failed to generate description";
}
