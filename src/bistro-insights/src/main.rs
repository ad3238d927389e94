//! Bistro Insights — customer analytics service for restaurant marketing.
//!
//! Main entry point that loads configuration, wires the scoring engines and
//! external collaborators, and starts the server.

use bistro_api::{ApiServer, AppState};
use bistro_core::config::AppConfig;
use clap::Parser;
use tracing::{error, info};

/// Log filter used when `RUST_LOG` is unset. Covers every workspace crate so
/// per-record rejections and collaborator retries are visible.
const DEFAULT_LOG_FILTER: &str = "bistro_insights=info,bistro_api=info,bistro_core=info,\
bistro_segmentation=info,bistro_predictive=info,bistro_personalization=info,\
bistro_feedback=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "bistro-insights")]
#[command(about = "Customer segmentation, churn/LTV prediction, menu recommendations, and feedback insights")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "BISTRO_INSIGHTS__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "BISTRO_INSIGHTS__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Embedding provider endpoint (overrides config)
    #[arg(long, env = "BISTRO_INSIGHTS__COLLABORATORS__EMBEDDING_URL")]
    embedding_url: Option<String>,

    /// Feedback classifier endpoint (overrides config)
    #[arg(long, env = "BISTRO_INSIGHTS__COLLABORATORS__CLASSIFIER_URL")]
    classifier_url: Option<String>,

    /// Do not start the Prometheus exporter
    #[arg(long, default_value_t = false)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Bistro Insights starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(url) = cli.embedding_url {
        config.collaborators.embedding_url = Some(url);
    }
    if let Some(url) = cli.classifier_url {
        config.collaborators.classifier_url = Some(url);
    }
    if cli.no_metrics {
        config.metrics.enabled = false;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        max_batch_size = config.api.max_batch_size,
        similarity_threshold = config.recommendation.similarity_threshold,
        top_k = config.recommendation.top_k,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;
    let api_server = ApiServer::new(config.clone(), state);

    // Start metrics exporter
    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics().await {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("Bistro Insights is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_library_crates() {
        for target in [
            "bistro_core",
            "bistro_segmentation",
            "bistro_predictive",
            "bistro_personalization",
            "bistro_feedback",
            "bistro_api",
        ] {
            assert!(
                DEFAULT_LOG_FILTER.contains(&format!("{target}=info")),
                "missing {target}"
            );
        }
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
