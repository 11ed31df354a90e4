//! Application configuration management
//!
//! Configuration is loaded from a TOML file, completed with provider keys
//! from the environment and validated once at startup. The resolved `Config`
//! is then handed to the orchestrator; nothing reads the environment later.

use crate::core::constants::{env, upstream};
use crate::core::provider::ProviderType;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default per-provider request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default server port
const DEFAULT_PORT: u16 = 5000;

/// Default completion length
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The fallback chain never exceeds a primary and a secondary provider
const MAX_PROVIDERS: usize = 2;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProviderSection {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub expose_upstream_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            expose_upstream_errors: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_provider_order() -> Vec<String> {
    vec!["gemini".to_string(), "openai".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_provider_order")]
    pub provider_order: Vec<String>,
    #[serde(default)]
    pub gemini: ProviderSection,
    #[serde(default)]
    pub openai: ProviderSection,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Resolved credentials and endpoint of one upstream provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl ProviderSettings {
    fn resolve(
        section: ProviderSection,
        key_var: &str,
        default_base_url: &str,
        default_model: &str,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Self {
        let api_key = section
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup(key_var))
            .unwrap_or_default();

        Self {
            api_key: api_key.trim().to_string(),
            base_url: section
                .base_url
                .unwrap_or_else(|| default_base_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: section.model.unwrap_or_else(|| default_model.to_string()),
        }
    }
}

/// Application configuration
///
/// All values are resolved and validated at startup so the service fails
/// fast when misconfigured.
#[derive(Debug, Clone)]
pub struct Config {
    /// Providers in fallback order; the first is the primary
    pub provider_order: Vec<ProviderType>,

    pub gemini: ProviderSettings,

    pub openai: ProviderSettings,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Include the last upstream error in 500 responses
    pub expose_upstream_errors: bool,

    /// Per-provider request timeout in seconds
    pub request_timeout: u64,

    pub max_output_tokens: u32,

    pub temperature: f32,
}

impl Config {
    /// Parse and validate configuration from TOML text
    ///
    /// `lookup` supplies environment values for API keys missing from the
    /// file.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed, names an unknown provider or
    /// fails validation.
    pub fn from_toml_str(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;

        let provider_order = config
            .provider_order
            .iter()
            .map(|name| name.parse::<ProviderType>().map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()
            .context("Invalid provider_order")?;

        let resolved = Config {
            provider_order,
            gemini: ProviderSettings::resolve(
                config.gemini,
                env::GEMINI_API_KEY,
                upstream::GEMINI_BASE_URL,
                upstream::GEMINI_MODEL,
                &lookup,
            ),
            openai: ProviderSettings::resolve(
                config.openai,
                env::OPENAI_API_KEY,
                upstream::OPENAI_BASE_URL,
                upstream::OPENAI_MODEL,
                &lookup,
            ),
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            expose_upstream_errors: config.server.expose_upstream_errors,
            request_timeout: config.request.request_timeout,
            max_output_tokens: config.request.max_output_tokens,
            temperature: config.request.temperature,
        };

        resolved.validate()?;
        Ok(resolved)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_toml_str(&content, |name| std::env::var(name).ok())
    }

    /// Load configuration from `CONFIG_PATH` or `config.toml`
    ///
    /// An explicit `CONFIG_PATH` must exist. Without it, a missing
    /// `config.toml` means defaults plus environment keys.
    pub fn from_env() -> Result<Self> {
        match std::env::var(env::CONFIG_PATH) {
            Ok(path) => Self::from_file(path),
            Err(_) if Path::new("config.toml").exists() => Self::from_file("config.toml"),
            Err(_) => Self::from_toml_str("", |name| std::env::var(name).ok()),
        }
    }

    /// Check the fallback chain is usable
    pub fn validate(&self) -> Result<()> {
        if self.provider_order.is_empty() {
            bail!("provider_order must name at least one provider");
        }
        if self.provider_order.len() > MAX_PROVIDERS {
            bail!(
                "provider_order names {} providers, at most {} are supported",
                self.provider_order.len(),
                MAX_PROVIDERS
            );
        }
        if self.provider_order.len() == 2 && self.provider_order[0] == self.provider_order[1] {
            bail!("provider_order must not repeat a provider");
        }
        for kind in &self.provider_order {
            let settings = self.settings(*kind);
            if settings.api_key.is_empty() {
                bail!(
                    "API key missing for provider '{}' (set [{}].api_key or {})",
                    kind,
                    kind,
                    Self::key_var(*kind)
                );
            }
            if settings.model.trim().is_empty() {
                bail!("model missing for provider '{}'", kind);
            }
        }
        if self.request_timeout == 0 {
            bail!("request.request_timeout must be greater than zero");
        }
        Ok(())
    }

    /// Settings of one provider
    pub fn settings(&self, kind: ProviderType) -> &ProviderSettings {
        match kind {
            ProviderType::Gemini => &self.gemini,
            ProviderType::OpenAI => &self.openai,
        }
    }

    fn key_var(kind: ProviderType) -> &'static str {
        match kind {
            ProviderType::Gemini => env::GEMINI_API_KEY,
            ProviderType::OpenAI => env::OPENAI_API_KEY,
        }
    }
}
