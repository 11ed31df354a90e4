//! Translation between provider-neutral prompts and upstream wire formats

pub mod request_converter;
pub mod response_converter;
