//! Shipping delay estimation types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{HistoricalRecord, PredictionSource};

/// Number of features in the shipping model schema.
pub const SHIPPING_FEATURE_COUNT: usize = 8;

/// Canonical shipping feature order.
pub const SHIPPING_FEATURE_NAMES: [&str; SHIPPING_FEATURE_COUNT] = [
    "distance",
    "cargo_volume_ton",
    "capacity_ton",
    "rainfall_mm",
    "wind_speed_kmh",
    "wave_height_m",
    "temperature_c",
    "humidity_percent",
];

/// Weather risk for a single voyage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Vessel speed relative to its nominal speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedStatus {
    Slow,
    Normal,
    Fast,
}

impl std::fmt::Display for SpeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedStatus::Slow => write!(f, "Slow"),
            SpeedStatus::Normal => write!(f, "Normal"),
            SpeedStatus::Fast => write!(f, "Fast"),
        }
    }
}

/// Per-voyage inputs of the shipping delay model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShippingFeatures {
    pub distance: f64,
    pub cargo_volume_ton: f64,
    pub capacity_ton: f64,
    pub rainfall_mm: f64,
    pub wind_speed_kmh: f64,
    pub wave_height_m: f64,
    pub temperature_c: f64,
    pub humidity_percent: f64,
}

impl ShippingFeatures {
    /// Values in [`SHIPPING_FEATURE_NAMES`] order. Missing cells become 0.0.
    pub fn to_array(&self) -> [f64; SHIPPING_FEATURE_COUNT] {
        [
            self.distance,
            self.cargo_volume_ton,
            self.capacity_ton,
            self.rainfall_mm,
            self.wind_speed_kmh,
            self.wave_height_m,
            self.temperature_c,
            self.humidity_percent,
        ]
        .map(|v| if v.is_finite() { v } else { 0.0 })
    }
}

impl From<&HistoricalRecord> for ShippingFeatures {
    fn from(r: &HistoricalRecord) -> Self {
        Self {
            distance: r.distance,
            cargo_volume_ton: r.cargo_volume_ton,
            capacity_ton: r.capacity_ton,
            rainfall_mm: r.rainfall_mm,
            wind_speed_kmh: r.wind_speed_kmh,
            wave_height_m: r.wave_height_m,
            temperature_c: r.temperature_c,
            humidity_percent: r.humidity_percent,
        }
    }
}

/// Delay estimate for one voyage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingSimulationResult {
    pub departure_date: NaiveDateTime,
    pub risk_level: RiskLevel,
    pub speed_status: SpeedStatus,
    /// actual / base speed (1.0 when base speed is unknown)
    pub speed_ratio: f64,
    pub original_estimate: NaiveDateTime,
    pub new_estimate: NaiveDateTime,
    /// max(0, new - original) in hours
    pub delay_hours: f64,
    pub predicted_delay_hours: f64,
    pub prediction_source: PredictionSource,
    pub input_features: ShippingFeatures,
}

/// All per-voyage estimates for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingBatchResult {
    /// Week the window was anchored on, if the request was windowed
    pub week_start: Option<NaiveDate>,
    pub results: Vec<ShippingSimulationResult>,
    pub high_risk_count: usize,
    pub average_delay_hours: f64,
    /// True when no history was available and the default scenario was used
    pub used_default_scenario: bool,
}

impl ShippingBatchResult {
    pub fn new(
        week_start: Option<NaiveDate>,
        results: Vec<ShippingSimulationResult>,
        used_default_scenario: bool,
    ) -> Self {
        let high_risk_count = results
            .iter()
            .filter(|r| r.risk_level == RiskLevel::High)
            .count();
        let average_delay_hours = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.predicted_delay_hours).sum::<f64>() / results.len() as f64
        };
        Self {
            week_start,
            results,
            high_risk_count,
            average_delay_hours,
            used_default_scenario,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }

    #[test]
    fn test_shipping_features_replace_missing_cells() {
        let f = ShippingFeatures {
            distance: f64::NAN,
            wave_height_m: 1.5,
            ..Default::default()
        };
        let arr = f.to_array();
        assert_eq!(arr[0], 0.0);
        assert_eq!(arr[5], 1.5);
    }

    #[test]
    fn test_empty_batch_has_zero_average() {
        let batch = ShippingBatchResult::new(None, Vec::new(), false);
        assert_eq!(batch.average_delay_hours, 0.0);
        assert_eq!(batch.high_risk_count, 0);
    }
}
