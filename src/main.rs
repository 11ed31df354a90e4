//! Aharyas Assist
//!
//! Backend for the Aharyas storefront chat-bot advisor. Chat messages and
//! product description requests are answered by a generative-text provider,
//! falling back from the primary to the secondary provider on failure.

mod api;
mod conversion;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::orchestrator::Orchestrator;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    // Pick up provider keys from a local .env file if present
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    print_startup_banner(&config);

    let orchestrator = match Orchestrator::from_config(&config) {
        Ok(orchestrator) => Arc::new(orchestrator),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let names: Vec<&str> = orchestrator
        .providers()
        .iter()
        .map(|p| p.provider_name())
        .collect();
    info!("Provider chain: {}", names.join(" -> "));

    let app = create_router(AppState {
        config: config.clone(),
        orchestrator: orchestrator.clone(),
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🧵 Aharyas Assist v{}", env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    for (rank, kind) in config.provider_order.iter().enumerate() {
        let settings = config.settings(*kind);
        let label = if rank == 0 { "Primary" } else { "Secondary" };
        println!(
            "   {} provider: {} ({} @ {})",
            label, kind, settings.model, settings.base_url
        );
    }
    println!("   Request Timeout: {}s per provider", config.request_timeout);
    println!("   Max Output Tokens: {}", config.max_output_tokens);
    println!("   Server: {}:{}", config.host, config.port);
    println!(
        "   Upstream Error Details: {}",
        if config.expose_upstream_errors {
            "Exposed"
        } else {
            "Hidden"
        }
    );
    println!();
}

/// Print help message
fn print_help() {
    println!("Aharyas Assist v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: aharyas-assist [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Configuration is read from CONFIG_PATH (default: config.toml).");
    println!("Without a config file, defaults are used and keys come from the environment.");
    println!();
    println!("Environment variables (also read from .env):");
    println!("  CONFIG_PATH    - Path to the TOML configuration file");
    println!("  GEMINI_API_KEY - Gemini API key, used when [gemini].api_key is unset");
    println!("  OPENAI_API_KEY - OpenAI API key, used when [openai].api_key is unset");
    println!("  RUST_LOG       - Overrides [server].log_level");
    println!();
    println!("Endpoints:");
    println!("  POST /api/chat                  - Chat-bot reply");
    println!("  POST /api/generate-description  - Product description copy");
    println!("  GET  /health                    - Health check");
    println!("  GET  /test-connection           - Probe every provider");
}
