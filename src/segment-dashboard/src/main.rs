//! Segment Dashboard — rule-based customer segmentation with live analytics.
//!
//! Main entry point that wires configuration, the analytics store, and the
//! HTTP API together.

use clap::Parser;
use segment_analytics::AnalyticsStore;
use segment_api::ApiServer;
use segment_core::config::AppConfig;
use std::num::NonZeroUsize;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "segment-dashboard")]
#[command(about = "Rule-based customer segmentation with live prediction analytics")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "SEGMENT_DASHBOARD__NODE_ID")]
    node_id: Option<String>,

    /// Bind address (overrides config)
    #[arg(long, env = "SEGMENT_DASHBOARD__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "SEGMENT_DASHBOARD__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Artificial delay before each prediction is returned
    #[arg(long, env = "SEGMENT_DASHBOARD__PREDICTION__SIMULATED_LATENCY_MS")]
    simulated_latency_ms: Option<u64>,

    /// Retain at most this many predictions, at least 1 (default: unbounded)
    #[arg(long, env = "SEGMENT_DASHBOARD__STORE__MAX_HISTORY")]
    max_history: Option<NonZeroUsize>,

    /// Disable the Prometheus exporter
    #[arg(long, default_value_t = false)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segment_dashboard=info,segment_api=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Segment Dashboard starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(latency) = cli.simulated_latency_ms {
        config.prediction.simulated_latency_ms = latency;
    }
    if cli.max_history.is_some() {
        config.store.max_history = cli.max_history;
    }
    if cli.no_metrics {
        config.metrics.enabled = false;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        simulated_latency_ms = config.prediction.simulated_latency_ms,
        max_history = ?config.store.max_history,
        "Configuration loaded"
    );

    let store = AnalyticsStore::with_retention(config.store.max_history);
    let api_server = ApiServer::new(config.clone(), store);

    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics().await {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("Segment Dashboard is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
