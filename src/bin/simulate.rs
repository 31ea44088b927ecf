//! One-shot simulation CLI
//!
//! Runs a single mining or shipping simulation against a CSV dataset and
//! prints the result as JSON on stdout.
//!
//! # Usage
//! ```bash
//! ./simulate --csv data/history.csv --target 12000 --week-start 2024-03-04
//! ./simulate --csv data/history.csv --kind shipping --week-start 2024-03-04
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use mining_value::config::AppConfig;
use mining_value::dataset::HistoricalDataset;
use mining_value::features::parse_week_start;
use mining_value::simulation::Simulator;
use mining_value::types::SimulationResult;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Mining,
    Shipping,
}

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Run one weekly mining or shipping simulation and print JSON")]
#[command(version)]
struct Args {
    /// Historical dataset CSV (defaults to `dataset.csv_path` from config)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// TOML config file (defaults to MVO_CONFIG / ./mvo_config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulation to run
    #[arg(short, long, value_enum, default_value = "mining")]
    kind: Kind,

    /// Weekly production target (tons); also the default scenario cargo
    #[arg(short, long)]
    target: Option<f64>,

    /// Week start date, YYYY-MM-DD (default: today)
    #[arg(short, long)]
    week_start: Option<String>,

    /// Compact single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };

    let dataset = match args.csv.or_else(|| config.dataset.csv_path.clone()) {
        Some(path) => HistoricalDataset::from_csv_path(&path)
            .with_context(|| format!("failed to load dataset {}", path.display()))?,
        None => anyhow::bail!("no dataset given: pass --csv or set dataset.csv_path"),
    };

    let week_start = match args.week_start.as_deref() {
        Some(raw) => parse_week_start(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let target = args.target.unwrap_or(config.chat.default_target_ton);

    let simulator = Simulator::from_config(&config, Arc::new(dataset))?;
    let result = match args.kind {
        Kind::Mining => SimulationResult::Mining(simulator.run_mining(target, week_start)?),
        Kind::Shipping => SimulationResult::Shipping(simulator.run_shipping(week_start, target)?),
    };

    let json = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{json}");
    Ok(())
}
