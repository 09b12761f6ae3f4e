//! Prometheus exposition of the search metrics.
//!
//! Installs a global `metrics` recorder backed by `metrics-exporter-prometheus`
//! and serves it in Prometheus text format at `/metrics`. Without it, every
//! call in [`crate::metrics`] is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use tracing::info;

use crate::metrics::METRIC_REQUEST_DURATION;

/// Latency buckets for backend searches, in seconds.
const SEARCH_DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Handle for the installed Prometheus exporter.
#[derive(Debug)]
pub struct MetricsExporter {
    bind_addr: SocketAddr,
}

impl MetricsExporter {
    /// Install the Prometheus recorder globally and start its HTTP listener
    /// on `bind_addr` (an `ip:port` pair, e.g. `127.0.0.1:9090`).
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Fails when the address does not parse, when another recorder is
    /// already installed, or when the listener cannot be built.
    pub fn install(bind_addr: &str) -> Result<Self, MetricsExporterError> {
        let addr: SocketAddr = bind_addr
            .parse()
            .map_err(|e| MetricsExporterError::InvalidBindAddress(bind_addr.to_string(), e))?;

        PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_REQUEST_DURATION.to_string()),
                SEARCH_DURATION_BUCKETS,
            )?
            .with_http_listener(addr)
            .install()
            .map_err(|e| match e {
                BuildError::FailedToSetGlobalRecorder(_) => {
                    MetricsExporterError::RecorderAlreadyInstalled
                }
                other => other.into(),
            })?;

        info!(addr = %addr, "Prometheus metrics exporter started on http://{addr}/metrics");

        Ok(Self { bind_addr: addr })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Errors that can occur when installing the metrics exporter.
#[derive(Debug, thiserror::Error)]
pub enum MetricsExporterError {
    #[error("Invalid metrics bind address '{0}': {1}")]
    InvalidBindAddress(String, std::net::AddrParseError),

    #[error("A metrics recorder is already installed")]
    RecorderAlreadyInstalled,

    #[error("Failed to build Prometheus recorder: {0}")]
    BuildError(String),
}

impl From<BuildError> for MetricsExporterError {
    fn from(err: BuildError) -> Self {
        MetricsExporterError::BuildError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bind_address() {
        for addr in ["not-a-valid-addr", "localhost:9090", "127.0.0.1"] {
            let result = MetricsExporter::install(addr);
            assert!(
                matches!(result, Err(MetricsExporterError::InvalidBindAddress(ref a, _)) if a == addr),
                "expected InvalidBindAddress for {addr}"
            );
        }
    }

    #[tokio::test]
    async fn test_second_install_is_rejected() {
        let exporter = MetricsExporter::install("127.0.0.1:0").unwrap();
        assert!(exporter.bind_addr().ip().is_loopback());

        let again = MetricsExporter::install("127.0.0.1:0");
        assert!(matches!(again, Err(MetricsExporterError::RecorderAlreadyInstalled)));
    }

    #[test]
    fn test_error_display() {
        let parse_error = "invalid".parse::<SocketAddr>().unwrap_err();
        let error = MetricsExporterError::InvalidBindAddress("invalid".to_string(), parse_error);
        assert!(error.to_string().starts_with("Invalid metrics bind address 'invalid'"));

        assert_eq!(
            MetricsExporterError::RecorderAlreadyInstalled.to_string(),
            "A metrics recorder is already installed"
        );
    }
}
