//! API server — HTTP REST endpoints and the Prometheus exporter.

use crate::rest::{self, AppState};
use crate::stream;
use axum::routing::{get, post};
use axum::Router;
use segment_analytics::AnalyticsStore;
use segment_core::config::AppConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the full router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Classification
        .route("/v1/predictions", post(rest::create_prediction))
        .route("/v1/segments", get(rest::list_segments))
        .route("/v1/segments/:id", get(rest::get_segment))
        // Analytics
        .route(
            "/v1/analytics",
            get(rest::get_analytics).delete(rest::reset_analytics),
        )
        .route("/v1/analytics/query", post(rest::query_analytics))
        .route("/v1/analytics/insights", get(rest::get_insights))
        .route("/v1/analytics/stream", get(stream::stream_snapshots))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server.
pub struct ApiServer {
    config: AppConfig,
    store: AnalyticsStore,
}

impl ApiServer {
    pub fn new(config: AppConfig, store: AnalyticsStore) -> Self {
        Self { config, store }
    }

    fn state(&self) -> AppState {
        AppState::new(self.store.clone(), self.config.node_id.clone()).with_simulated_latency(
            Duration::from_millis(self.config.prediction.simulated_latency_ms),
        )
    }

    /// Start the HTTP REST server. Returns after a shutdown signal.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.state());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
