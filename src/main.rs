//! scanwatch: GuardDuty malware scan status proxy.
//!
//! This is the application entry point. It initializes tracing, loads configuration
//! from a TOML file plus the AWS environment variables, builds the S3 client,
//! sets up the Axum router, and starts the HTTP server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scanwatch::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use scanwatch::http::start_server;
use scanwatch::storage::{S3TagStore, TagStore};
use scanwatch::{create_router, AppState};

/// scanwatch: report GuardDuty malware scan status for S3 uploads
#[derive(Parser, Debug)]
#[command(name = "scanwatch", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "scanwatch=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_filter: &str, logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(log_filter);

    if logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Pick up AWS_* from a local .env before the config overlay reads them
    dotenv::dotenv().ok();

    // Configuration comes first so the log format is known
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(path = %args.config, "Loaded configuration");

    let tag_store = S3TagStore::connect(&config.storage).await;
    tracing::info!(
        bucket = %tag_store.bucket(),
        region = config.storage.region.as_deref().unwrap_or("(provider chain)"),
        endpoint = config.storage.endpoint_url.as_deref().unwrap_or("(default)"),
        static_credentials = config.storage.has_credentials(),
        "Initialized S3 tag store"
    );

    let http_config = config.http.clone();
    let state = AppState::new(config, Arc::new(tag_store));
    let app = create_router(state);

    start_server(app, &http_config).await?;

    Ok(())
}
