//! API server — HTTP REST surface plus the Prometheus metrics listener.

use crate::state::AppState;
use crate::swagger::ApiDoc;
use crate::{feedback_rest, insights_rest, recommend_rest, rest};
use axum::routing::{get, post};
use axum::{Json, Router};
use bistro_core::config::AppConfig;
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;

/// Build the application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Customer analytics
        .route("/v1/customers/segments", post(insights_rest::handle_segments))
        .route("/v1/customers/churn", post(insights_rest::handle_churn))
        .route("/v1/customers/ltv", post(insights_rest::handle_ltv))
        .route("/v1/customers/insights", post(insights_rest::handle_insights))
        // Recommendations
        .route("/v1/recommendations", post(recommend_rest::handle_recommend))
        // Feedback
        .route("/v1/feedback/analyze", post(feedback_rest::handle_analyze_feedback))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server.
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.metrics.port);
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
