//! Predictor Adapter
//!
//! Wraps an externally trained regression model, or a deterministic heuristic
//! when none is available, behind a uniform `predict(features)` contract.
//! The variant travels into every [`Prediction`] as a [`PredictionSource`] so
//! callers can tell a model-backed number from a heuristic one.
//!
//! Model input order must match the fixed feature schema exactly. A model
//! declaring any other order is rejected at construction with
//! `SchemaMismatch`; inputs are never truncated or reordered.

mod linear;

pub use linear::LinearModel;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::defaults::HEURISTIC_CAPACITY_FACTOR;
use crate::error::{SimResult, SimulationError};
use crate::types::{
    FeatureVector, Prediction, PredictionSource, ShippingFeatures, FEATURE_NAMES,
    SHIPPING_FEATURE_NAMES,
};

/// Any pre-trained model offering `predict(vector) -> scalar`.
///
/// Implementations must be read-only during inference so one instance can
/// serve concurrent requests.
pub trait RegressionModel: Send + Sync + fmt::Debug {
    /// Input feature names in the order `predict` expects them.
    fn feature_names(&self) -> &[String];

    fn predict(&self, input: &[f64]) -> Result<f64, String>;
}

fn check_schema(model: &dyn RegressionModel, schema: &[&str]) -> SimResult<()> {
    let declared = model.feature_names();
    if declared.iter().map(String::as_str).eq(schema.iter().copied()) {
        Ok(())
    } else {
        Err(SimulationError::SchemaMismatch {
            expected: declared.to_vec(),
            actual: schema.iter().map(|s| s.to_string()).collect(),
        })
    }
}

fn run_model(model: &dyn RegressionModel, input: &[f64]) -> SimResult<f64> {
    let value = model.predict(input).map_err(SimulationError::Predictor)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::Predictor(format!(
            "model returned non-finite value {value}"
        )))
    }
}

fn load_linear(path: Option<&Path>, label: &str) -> SimResult<Option<Arc<dyn RegressionModel>>> {
    match path {
        Some(p) => {
            let model = LinearModel::load(p)?;
            info!(path = %p.display(), model = label, "Loaded regression model");
            Ok(Some(Arc::new(model)))
        }
        None => {
            warn!(model = label, "No model configured, using heuristic fallback");
            Ok(None)
        }
    }
}

// ============================================================================
// Mining Production Predictor
// ============================================================================

/// Weekly production predictor over the 14-feature schema.
#[derive(Debug, Clone)]
pub enum Predictor {
    ModelBacked(Arc<dyn RegressionModel>),
    /// `predicted = capacity_ton * 0.8`
    HeuristicFallback,
}

impl Predictor {
    /// Wrap a model after checking its declared feature order.
    pub fn model_backed(model: Arc<dyn RegressionModel>) -> SimResult<Self> {
        check_schema(model.as_ref(), &FEATURE_NAMES)?;
        Ok(Self::ModelBacked(model))
    }

    pub fn heuristic() -> Self {
        Self::HeuristicFallback
    }

    /// Load a JSON linear model from `path`, or fall back when `None`.
    pub fn from_model_path(path: Option<&Path>) -> SimResult<Self> {
        match load_linear(path, "mining")? {
            Some(model) => Self::model_backed(model),
            None => Ok(Self::heuristic()),
        }
    }

    pub fn source(&self) -> PredictionSource {
        match self {
            Self::ModelBacked(_) => PredictionSource::ModelBacked,
            Self::HeuristicFallback => PredictionSource::HeuristicFallback,
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> SimResult<Prediction> {
        match self {
            Self::ModelBacked(model) => Ok(Prediction {
                value: run_model(model.as_ref(), &features.to_array())?,
                source: PredictionSource::ModelBacked,
            }),
            Self::HeuristicFallback => Ok(Self::heuristic_prediction(features)),
        }
    }

    pub fn heuristic_prediction(features: &FeatureVector) -> Prediction {
        Prediction {
            value: features.capacity_ton * HEURISTIC_CAPACITY_FACTOR,
            source: PredictionSource::HeuristicFallback,
        }
    }
}

// ============================================================================
// Shipping Delay Predictor
// ============================================================================

/// Per-voyage delay predictor over the 8-feature shipping schema.
#[derive(Debug, Clone)]
pub enum ShippingPredictor {
    ModelBacked(Arc<dyn RegressionModel>),
    /// Predicted delay equals the delay computed from the estimates
    HeuristicFallback,
}

impl ShippingPredictor {
    pub fn model_backed(model: Arc<dyn RegressionModel>) -> SimResult<Self> {
        check_schema(model.as_ref(), &SHIPPING_FEATURE_NAMES)?;
        Ok(Self::ModelBacked(model))
    }

    pub fn heuristic() -> Self {
        Self::HeuristicFallback
    }

    pub fn from_model_path(path: Option<&Path>) -> SimResult<Self> {
        match load_linear(path, "shipping")? {
            Some(model) => Self::model_backed(model),
            None => Ok(Self::heuristic()),
        }
    }

    pub fn source(&self) -> PredictionSource {
        match self {
            Self::ModelBacked(_) => PredictionSource::ModelBacked,
            Self::HeuristicFallback => PredictionSource::HeuristicFallback,
        }
    }

    /// Predicted delay in hours, never negative.
    pub fn predict(
        &self,
        features: &ShippingFeatures,
        computed_delay_hours: f64,
    ) -> SimResult<Prediction> {
        match self {
            Self::ModelBacked(model) => Ok(Prediction {
                value: run_model(model.as_ref(), &features.to_array())?.max(0.0),
                source: PredictionSource::ModelBacked,
            }),
            Self::HeuristicFallback => Ok(Prediction {
                value: computed_delay_hours.max(0.0),
                source: PredictionSource::HeuristicFallback,
            }),
        }
    }
}
