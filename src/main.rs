//! AI Solution site server.
//!
//! Entry point: configuration, tracing and the Axum server.

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::unused_async)]

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ai_solution_site::config::AppConfig;
use ai_solution_site::server;

#[tokio::main]
async fn main() {
    // Load .env (if present) before reading RUST_LOG or config env vars
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED); LOG_FORMAT=json for log shippers
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with((!json).then(|| fmt::layer().with_target(true)))
        .with(json.then(|| fmt::layer().json()))
        .init();

    let config = match AppConfig::load() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    info!(
        name: "config.loaded",
        host = %config.server.host,
        port = config.server.port,
        chat_base_url = %config.chat.base_url,
        api_base_url = %config.api.base_url,
        "Configuration loaded"
    );

    if let Err(e) = server::start_server(config).await {
        tracing::error!(name: "server.failed", error = %e, "Server exited with error");
        std::process::exit(1);
    }
}
