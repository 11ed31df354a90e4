//! Logging configuration and initialization
//!
//! Sets up the tracing subscriber used by every module of the service.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Levels accepted in `server.log_level`
const VALID_LEVELS: [&str; 6] = ["debug", "info", "warning", "warn", "error", "critical"];

/// Normalize a configured log level into a tracing filter directive
///
/// Only the first word is considered so trailing comments are ignored.
/// `warning` maps to `warn`, `critical` to `error`, anything unknown to `info`.
pub fn normalize_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    if !VALID_LEVELS.contains(&level.as_str()) {
        return "info";
    }

    match level.as_str() {
        "debug" => "debug",
        "warning" | "warn" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Initialize the logging system with the specified level
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_are_mapped() {
        assert_eq!(normalize_level("warning"), "warn");
        assert_eq!(normalize_level("CRITICAL"), "error");
        assert_eq!(normalize_level("debug # verbose"), "debug");
    }

    #[test]
    fn test_unknown_level_defaults_to_info() {
        assert_eq!(normalize_level("trace-ish"), "info");
        assert_eq!(normalize_level(""), "info");
    }
}
