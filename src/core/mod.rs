//! Core application modules
//!
//! Configuration, logging, prompts, the provider strategies and the
//! orchestrator that chains them.

pub mod config;
pub mod constants;
pub mod logging;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod providers;
