//! Mining Value Optimizer: weekly production and shipping delay simulation
//!
//! Chat-driven decision support for a mining value chain.
//!
//! ## Architecture
//!
//! - **Dataset**: historical per-voyage records loaded from CSV
//! - **Features**: 28-day window aggregation into a fixed feature vector
//! - **Predictor**: model-backed or heuristic production/delay regression
//! - **Rules**: primary operational rules plus knowledge-base rules
//! - **Simulation**: mining orchestrator and per-voyage shipping estimator
//! - **Agent / LLM**: intent routing and narration of simulation results
//! - **API**: Axum HTTP surface

pub mod agent;
pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod llm;
pub mod predictor;
pub mod rules;
pub mod simulation;
pub mod types;

pub use config::AppConfig;
pub use dataset::HistoricalDataset;
pub use error::{SimResult, SimulationError};
pub use simulation::{run_simulation, Simulator};
pub use types::{
    FeatureVector, FeatureWindow, HistoricalRecord, MiningSimulationResult, PredictionSource,
    RiskLevel, ShippingBatchResult, ShippingSimulationResult, SimulationResult,
};
