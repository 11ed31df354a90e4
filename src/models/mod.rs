//! API data models
//!
//! Storefront-facing request/response bodies and the wire formats of the
//! Gemini and OpenAI APIs.

pub mod chat;
pub mod gemini;
pub mod openai;
