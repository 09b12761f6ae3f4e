//! Demand log viewer server.
//!
//! Invariants:
//! - `load_dotenv()` runs before argument parsing so `.env` can feed clap env defaults.
//! - Precedence is CLI flag, then environment, then default.

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use args::{Args, LogFormat};
use logviewer_client::{MetricsCollector, MetricsExporter, SearchClient};
use logviewer_config::ConfigLoader;
use logviewer_engine::{ErrorLedger, LogEngine};
use logviewer_server::{AppState, app};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    ConfigLoader::new()
        .load_dotenv()
        .context("Failed to load .env")?;

    let args = Args::parse();
    init_tracing(args.log_format);

    let metrics_exporter = args
        .metrics_bind
        .as_deref()
        .map(MetricsExporter::install)
        .transpose()
        .context("Failed to start metrics exporter")?;
    let metrics = if metrics_exporter.is_some() {
        MetricsCollector::new()
    } else {
        MetricsCollector::disabled()
    };

    let loader = ConfigLoader::new()
        .from_env()
        .context("Failed to load configuration from environment")?;
    let config = args
        .apply(loader)
        .build()
        .context("Invalid configuration")?;

    let client = SearchClient::builder()
        .from_config(&config.search)
        .metrics(metrics)
        .build()
        .context("Failed to build search client")?;

    let engine = LogEngine::new(Arc::new(client), ErrorLedger::new(&config.ledger_path))
        .context("Failed to build log engine")?;
    let router = app(AppState::new(engine), &config.server.cors_origins);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        addr = %addr,
        search_url = %config.search.base_url,
        ledger = %config.ledger_path.display(),
        "API server listening"
    );

    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}
