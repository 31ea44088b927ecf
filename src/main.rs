//! Mining Value Optimizer - chat and simulation server
//!
//! # Usage
//!
//! ```bash
//! # Serve with the dataset named in mvo_config.toml
//! cargo run --release
//!
//! # Override dataset and listen address
//! cargo run --release -- --csv data/history.csv --addr 127.0.0.1:9000
//! ```
//!
//! # Environment Variables
//!
//! - `MVO_CONFIG`: Path to the TOML config file (default: ./mvo_config.toml)
//! - `GEMINI_API_KEY`: Enables LLM narration (name configurable via `llm.api_key_env`)
//! - `MVO_CORS_ORIGINS`: Comma-separated origins allowed by CORS
//! - `MVO_LOG_FORMAT`: Set to "json" for structured JSON logs
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mining_value::agent::{system_clock, ChatRouter};
use mining_value::api::{create_app, ApiState};
use mining_value::config::AppConfig;
use mining_value::dataset::HistoricalDataset;
use mining_value::llm::backend_from_config;
use mining_value::simulation::Simulator;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "mining-value-optimizer")]
#[command(about = "Mining Value Chain simulation and chat server")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default from config: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a TOML config file (takes precedence over MVO_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the historical dataset CSV (overrides `dataset.csv_path`)
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("MVO_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// A configured dataset that fails to load is fatal; no dataset at all
/// starts the server on an empty one.
fn load_dataset(path: Option<&PathBuf>) -> Result<HistoricalDataset> {
    match path {
        Some(p) => {
            let dataset = HistoricalDataset::from_csv_path(p)
                .with_context(|| format!("failed to load dataset {}", p.display()))?;
            info!(path = %p.display(), records = dataset.len(), "Dataset loaded");
            Ok(dataset)
        }
        None => {
            warn!("No dataset configured, simulations will run on an empty history");
            Ok(HistoricalDataset::empty())
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };
    let server_addr = args.addr.unwrap_or_else(|| config.server.addr.clone());

    let csv_path = args.csv.or_else(|| config.dataset.csv_path.clone());
    let dataset = Arc::new(load_dataset(csv_path.as_ref())?);

    let simulator =
        Simulator::from_config(&config, dataset).context("failed to initialise simulator")?;
    let llm = backend_from_config(&config.llm);

    info!("  Mining Value Optimizer");
    info!(
        prediction = %simulator.predictor().source(),
        shipping_prediction = %simulator.shipping().predictor_source(),
        llm = llm.backend_name(),
        "Simulation core ready"
    );

    let router = ChatRouter::new(
        Arc::new(simulator),
        llm,
        config.chat.default_target_ton,
        system_clock(),
    );
    let app = create_app(ApiState::new(router));

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("failed to bind {server_addr}"))?;
    info!(addr = %server_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("Shutdown complete");
    Ok(())
}
