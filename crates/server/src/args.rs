//! Command-line arguments.
//!
//! Every flag is optional; unset flags fall through to the environment and
//! then to built-in defaults (see `logviewer-config`).

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use logviewer_config::ConfigLoader;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "logviewer-server")]
#[command(about = "Demand log viewer - fan-out search across service logs by demand ID", long_about = None)]
#[command(version)]
pub struct Args {
    /// Base URL of the search backend (e.g., http://localhost:9200)
    #[arg(long)]
    pub search_url: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind
    #[arg(long)]
    pub bind: Option<String>,

    /// Path of the append-only error ledger
    #[arg(long, value_name = "FILE")]
    pub ledger_path: Option<PathBuf>,

    /// Per-search timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Serve Prometheus metrics at `/metrics` on this address (e.g., 127.0.0.1:9090)
    #[arg(long, env = "LOGVIEWER_METRICS_BIND", value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    /// Log output format
    #[arg(long, value_enum, env = "LOGVIEWER_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

impl Args {
    /// Layer CLI flags over an already env-populated loader.
    pub fn apply(&self, mut loader: ConfigLoader) -> ConfigLoader {
        if let Some(url) = self.search_url.as_ref().filter(|s| !s.trim().is_empty()) {
            loader = loader.with_search_url(url.clone());
        }
        if let Some(port) = self.port {
            loader = loader.with_port(port);
        }
        if let Some(host) = self.bind.as_ref().filter(|s| !s.trim().is_empty()) {
            loader = loader.with_host(host.clone());
        }
        if let Some(path) = &self.ledger_path {
            loader = loader.with_ledger_path(path.clone());
        }
        if let Some(secs) = self.timeout {
            loader = loader.with_timeout(Duration::from_secs(secs));
        }
        loader
    }
}
