//! Prediction and simulation result types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FeatureVector, FeatureWindow, ShippingBatchResult};

/// Guards the achievement ratio against a zero target.
pub const ACHIEVEMENT_EPSILON: f64 = 1e-9;

/// Where a predicted value came from.
///
/// Heuristic predictions carry less confidence than model-backed ones, so the
/// tag travels all the way into the serialized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    ModelBacked,
    HeuristicFallback,
}

impl std::fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionSource::ModelBacked => write!(f, "model"),
            PredictionSource::HeuristicFallback => write!(f, "heuristic"),
        }
    }
}

/// A single scalar prediction and its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub value: f64,
    pub source: PredictionSource,
}

/// Predicted production scored against the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_production_ton: f64,
    pub achievement_percent: f64,
}

impl PredictionResult {
    /// `achievement = predicted / (target + 1e-9) * 100`
    pub fn score(predicted_production_ton: f64, target_ton: f64) -> Self {
        Self {
            predicted_production_ton,
            achievement_percent: predicted_production_ton / (target_ton + ACHIEVEMENT_EPSILON)
                * 100.0,
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Rule family. Weather severity, fleet health and achievement fire exactly
/// once per evaluation; the others are conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    WeatherSeverity,
    FleetHealth,
    ExtremeWeather,
    LoadRatio,
    Achievement,
    KnowledgeBase,
}

/// Identifier of an individual rule outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    WeatherSevere,
    WeatherModerate,
    WeatherFavorable,
    FleetHealthLow,
    FleetHealthDegraded,
    FleetHealthy,
    ExtremeWeatherFrequent,
    LoadRatioHigh,
    AchievementAtRisk,
    AchievementOnTrack,
    KbHighWind,
    KbHighWave,
    KbHeavyRainfall,
    KbLowShipments,
}

impl RuleId {
    pub fn category(self) -> RuleCategory {
        match self {
            RuleId::WeatherSevere | RuleId::WeatherModerate | RuleId::WeatherFavorable => {
                RuleCategory::WeatherSeverity
            }
            RuleId::FleetHealthLow | RuleId::FleetHealthDegraded | RuleId::FleetHealthy => {
                RuleCategory::FleetHealth
            }
            RuleId::ExtremeWeatherFrequent => RuleCategory::ExtremeWeather,
            RuleId::LoadRatioHigh => RuleCategory::LoadRatio,
            RuleId::AchievementAtRisk | RuleId::AchievementOnTrack => RuleCategory::Achievement,
            RuleId::KbHighWind
            | RuleId::KbHighWave
            | RuleId::KbHeavyRainfall
            | RuleId::KbLowShipments => RuleCategory::KnowledgeBase,
        }
    }

    /// True for rules of the secondary knowledge-base set.
    pub fn is_knowledge_base(self) -> bool {
        self.category() == RuleCategory::KnowledgeBase
    }
}

/// One fired rule: user-facing message plus machine-readable justification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub rule: RuleId,
    pub message: String,
    pub justification: String,
}

// ============================================================================
// Simulation Results
// ============================================================================

/// Window metadata reported alongside the feature vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub shipments: usize,
    pub insufficient_history: bool,
}

impl From<&FeatureWindow> for WindowSummary {
    fn from(window: &FeatureWindow) -> Self {
        Self {
            start: window.window_start,
            end: window.window_end,
            shipments: window.shipments,
            insufficient_history: !window.has_history(),
        }
    }
}

/// Weekly mining production simulation outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiningSimulationResult {
    pub target_ton: f64,
    pub week_start: NaiveDate,
    pub window: WindowSummary,
    pub input_features: FeatureVector,
    pub predicted_production_ton: f64,
    pub achievement_percent: f64,
    pub prediction_source: PredictionSource,
    /// Primary rules first, knowledge-base rules after
    pub recommendations: Vec<String>,
    /// Rule ids parallel to `recommendations`
    pub fired_rules: Vec<RuleId>,
    /// Justification fragments joined with single spaces
    pub justification: String,
}

/// Either kind of simulation, tagged with `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationResult {
    Mining(MiningSimulationResult),
    Shipping(ShippingBatchResult),
}
