//! Shared data structures for the mining value simulation pipeline
//!
//! - HistoricalRecord: one observed voyage (dataset row)
//! - FeatureVector / FeatureWindow: trailing-window aggregates
//! - Prediction / PredictionResult: model output scored against the target
//! - Recommendation / RuleId: rule engine outputs
//! - MiningSimulationResult / ShippingBatchResult: orchestrator outputs

mod record;
mod features;
mod simulation;
mod shipping;

pub use record::*;
pub use features::*;
pub use simulation::*;
pub use shipping::*;
