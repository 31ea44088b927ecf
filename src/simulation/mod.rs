//! Simulation Orchestrator
//!
//! One request/response cycle of the weekly mining simulation:
//!
//! ```text
//! build features -> predict -> score achievement -> rules (primary, KB) -> result
//! ```
//!
//! No step is reordered and no partial result is ever returned: any failure
//! surfaces as a [`SimulationError`]. Shipping delay estimation is a separate
//! operation in [`shipping`] producing one result per voyage.

pub mod shipping;

pub use shipping::{ShippingEstimator, ShippingScenario};

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dataset::HistoricalDataset;
use crate::error::{SimResult, SimulationError};
use crate::features::build_window;
use crate::predictor::{Predictor, ShippingPredictor};
use crate::rules::RuleEngine;
use crate::types::{
    MiningSimulationResult, Prediction, PredictionResult, ShippingBatchResult, WindowSummary,
};

/// `run_simulation(dataset, target_ton, week_start, model)` with the default
/// rule thresholds. Predictor failures propagate.
pub fn run_simulation(
    dataset: &HistoricalDataset,
    target_ton: f64,
    week_start: NaiveDate,
    predictor: &Predictor,
) -> SimResult<MiningSimulationResult> {
    simulate_mining(
        dataset,
        target_ton,
        week_start,
        predictor,
        &RuleEngine::default(),
        false,
    )
}

fn check_target(target_ton: f64) -> SimResult<()> {
    if target_ton.is_finite() && target_ton > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidInput(format!(
            "target_ton must be a positive number, got {target_ton}"
        )))
    }
}

fn simulate_mining(
    dataset: &HistoricalDataset,
    target_ton: f64,
    week_start: NaiveDate,
    predictor: &Predictor,
    rules: &RuleEngine,
    fallback_on_predictor_error: bool,
) -> SimResult<MiningSimulationResult> {
    check_target(target_ton)?;

    let window = build_window(dataset, week_start);
    if !window.has_history() {
        info!(week_start = %week_start, "No records in window, features are all zero");
    }

    let prediction: Prediction = match predictor.predict(&window.features) {
        Ok(p) => p,
        Err(SimulationError::Predictor(msg)) if fallback_on_predictor_error => {
            warn!(error = %msg, "Mining model failed, falling back to heuristic");
            Predictor::heuristic_prediction(&window.features)
        }
        Err(e) => return Err(e),
    };

    let scored = PredictionResult::score(prediction.value, target_ton);
    let evaluation = rules.evaluate_all(
        &window.features,
        window.shipments,
        scored.achievement_percent,
    );

    info!(
        target_ton = %target_ton,
        week_start = %week_start,
        predicted = scored.predicted_production_ton,
        achievement = scored.achievement_percent,
        source = %prediction.source,
        "Mining simulation complete"
    );

    let fired_rules = evaluation.fired_rules();
    let (recommendations, justification) = evaluation.into_parts();

    Ok(MiningSimulationResult {
        target_ton,
        week_start,
        window: WindowSummary::from(&window),
        input_features: window.features,
        predicted_production_ton: scored.predicted_production_ton,
        achievement_percent: scored.achievement_percent,
        prediction_source: prediction.source,
        recommendations,
        fired_rules,
        justification,
    })
}

// ============================================================================
// Simulator Service
// ============================================================================

/// Explicitly constructed simulation service shared by the HTTP layer, the
/// chat router and the CLI. Holds the read-only dataset and loaded models.
#[derive(Debug, Clone)]
pub struct Simulator {
    dataset: Arc<HistoricalDataset>,
    predictor: Predictor,
    rules: RuleEngine,
    shipping: ShippingEstimator,
    fallback_on_predictor_error: bool,
}

impl Simulator {
    pub fn new(
        dataset: Arc<HistoricalDataset>,
        predictor: Predictor,
        rules: RuleEngine,
        shipping: ShippingEstimator,
        fallback_on_predictor_error: bool,
    ) -> Self {
        Self {
            dataset,
            predictor,
            rules,
            shipping,
            fallback_on_predictor_error,
        }
    }

    /// Heuristic predictors and default thresholds over `dataset`.
    pub fn with_defaults(dataset: HistoricalDataset) -> Self {
        Self::new(
            Arc::new(dataset),
            Predictor::heuristic(),
            RuleEngine::default(),
            ShippingEstimator::default(),
            false,
        )
    }

    /// Load models named in `config` and wire thresholds.
    pub fn from_config(config: &AppConfig, dataset: Arc<HistoricalDataset>) -> SimResult<Self> {
        let predictor = Predictor::from_model_path(config.model.mining_model_path.as_deref())?;
        let shipping_predictor =
            ShippingPredictor::from_model_path(config.model.shipping_model_path.as_deref())?;
        Ok(Self::new(
            dataset,
            predictor,
            RuleEngine::from_config(config),
            ShippingEstimator::new(
                config.shipping.clone(),
                shipping_predictor,
                config.model.fallback_on_predictor_error,
            ),
            config.model.fallback_on_predictor_error,
        ))
    }

    pub fn dataset(&self) -> &HistoricalDataset {
        &self.dataset
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn shipping(&self) -> &ShippingEstimator {
        &self.shipping
    }

    pub fn run_mining(
        &self,
        target_ton: f64,
        week_start: NaiveDate,
    ) -> SimResult<MiningSimulationResult> {
        simulate_mining(
            &self.dataset,
            target_ton,
            week_start,
            &self.predictor,
            &self.rules,
            self.fallback_on_predictor_error,
        )
    }

    /// Per-voyage estimates for the window; the default scenario carrying
    /// `cargo_volume_ton` is used when the window is empty.
    pub fn run_shipping(
        &self,
        week_start: NaiveDate,
        cargo_volume_ton: f64,
    ) -> SimResult<ShippingBatchResult> {
        check_target(cargo_volume_ton)?;
        self.shipping
            .estimate_window_or_scenario(&self.dataset, week_start, cargo_volume_ton)
    }
}
