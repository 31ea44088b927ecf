//! Shipping delay estimation
//!
//! One result per voyage record, kept separate from the weekly mining
//! aggregate. Each voyage gets a weather risk level, a speed status, and the
//! delay between its original and revised arrival estimates.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::config::{defaults, ShippingThresholds};
use crate::dataset::HistoricalDataset;
use crate::error::{SimResult, SimulationError};
use crate::features::select_window;
use crate::predictor::ShippingPredictor;
use crate::types::{
    HistoricalRecord, Prediction, PredictionSource, RiskLevel, ShippingBatchResult,
    ShippingFeatures, ShippingSimulationResult, SpeedStatus,
};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// High if wave > 2 or wind > 30; Medium if wave > 1 or wind > 20; else Low.
pub fn classify_risk(wave_height_m: f64, wind_speed_kmh: f64, t: &ShippingThresholds) -> RiskLevel {
    if wave_height_m > t.high_wave_height_m || wind_speed_kmh > t.high_wind_speed_kmh {
        RiskLevel::High
    } else if wave_height_m > t.medium_wave_height_m || wind_speed_kmh > t.medium_wind_speed_kmh {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// actual / base, or 1.0 when the base speed is missing or non-positive.
pub fn speed_ratio(actual_speed: f64, base_speed: f64) -> f64 {
    if base_speed > 0.0 && actual_speed.is_finite() {
        actual_speed / base_speed
    } else {
        1.0
    }
}

/// Slow below 0.8, Fast above 1.2, otherwise Normal.
pub fn classify_speed(ratio: f64, t: &ShippingThresholds) -> SpeedStatus {
    if ratio < t.slow_speed_ratio {
        SpeedStatus::Slow
    } else if ratio > t.fast_speed_ratio {
        SpeedStatus::Fast
    } else {
        SpeedStatus::Normal
    }
}

fn add_travel_time(departure: NaiveDateTime, distance: f64, speed: f64) -> Option<NaiveDateTime> {
    if !(distance.is_finite() && speed.is_finite() && speed > 0.0) {
        return None;
    }
    let millis = (distance / speed * MILLIS_PER_HOUR).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 / 2.0 {
        return None;
    }
    departure.checked_add_signed(Duration::try_milliseconds(millis as i64)?)
}

/// `(original_estimate, new_estimate)` for one voyage.
///
/// Explicit estimate columns win; otherwise travel time is derived from
/// distance and base/actual speed. A voyage without a usable actual speed
/// keeps its original estimate.
pub fn arrival_estimates(record: &HistoricalRecord) -> (NaiveDateTime, NaiveDateTime) {
    let original = record
        .arrival_estimate
        .or_else(|| add_travel_time(record.departure_date, record.distance, record.base_speed))
        .unwrap_or(record.departure_date);
    let revised = record
        .revised_arrival_estimate
        .or_else(|| add_travel_time(record.departure_date, record.distance, record.actual_speed))
        .unwrap_or(original);
    (original, revised)
}

/// `max(0, new - original)` in hours.
pub fn delay_hours(original: NaiveDateTime, new: NaiveDateTime) -> f64 {
    ((new - original).num_milliseconds() as f64 / MILLIS_PER_HOUR).max(0.0)
}

// ============================================================================
// Default Scenario
// ============================================================================

/// Single-voyage scenario for requests without history.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingScenario {
    pub features: ShippingFeatures,
}

impl ShippingScenario {
    /// Calm-sea 100 km voyage carrying `cargo_volume_ton`.
    pub fn default_for_cargo(cargo_volume_ton: f64) -> Self {
        Self {
            features: ShippingFeatures {
                distance: defaults::SCENARIO_DISTANCE,
                cargo_volume_ton,
                capacity_ton: defaults::SCENARIO_CAPACITY_TON,
                rainfall_mm: defaults::SCENARIO_RAINFALL_MM,
                wind_speed_kmh: defaults::SCENARIO_WIND_SPEED_KMH,
                wave_height_m: defaults::SCENARIO_WAVE_HEIGHT_M,
                temperature_c: defaults::SCENARIO_TEMPERATURE_C,
                humidity_percent: defaults::SCENARIO_HUMIDITY_PERCENT,
            },
        }
    }

    /// Voyage record departing at `departure`. Speeds are unknown, so the
    /// computed delay is zero.
    pub fn to_record(&self, departure: NaiveDateTime) -> HistoricalRecord {
        let f = &self.features;
        HistoricalRecord {
            distance: f.distance,
            cargo_volume_ton: f.cargo_volume_ton,
            capacity_ton: f.capacity_ton,
            rainfall_mm: f.rainfall_mm,
            wind_speed_kmh: f.wind_speed_kmh,
            wave_height_m: f.wave_height_m,
            temperature_c: f.temperature_c,
            humidity_percent: f.humidity_percent,
            ..HistoricalRecord::at(departure)
        }
    }
}

// ============================================================================
// Estimator
// ============================================================================

#[derive(Debug, Clone)]
pub struct ShippingEstimator {
    thresholds: ShippingThresholds,
    predictor: ShippingPredictor,
    fallback_on_predictor_error: bool,
}

impl Default for ShippingEstimator {
    fn default() -> Self {
        Self::new(ShippingThresholds::default(), ShippingPredictor::heuristic(), false)
    }
}

impl ShippingEstimator {
    pub fn new(
        thresholds: ShippingThresholds,
        predictor: ShippingPredictor,
        fallback_on_predictor_error: bool,
    ) -> Self {
        Self {
            thresholds,
            predictor,
            fallback_on_predictor_error,
        }
    }

    pub fn predictor_source(&self) -> PredictionSource {
        self.predictor.source()
    }

    fn predict(&self, features: &ShippingFeatures, computed_delay: f64) -> SimResult<Prediction> {
        match self.predictor.predict(features, computed_delay) {
            Err(SimulationError::Predictor(msg)) if self.fallback_on_predictor_error => {
                warn!(error = %msg, "Shipping model failed, falling back to computed delay");
                ShippingPredictor::heuristic().predict(features, computed_delay)
            }
            other => other,
        }
    }

    pub fn estimate_record(&self, record: &HistoricalRecord) -> SimResult<ShippingSimulationResult> {
        let (original_estimate, new_estimate) = arrival_estimates(record);
        let delay = delay_hours(original_estimate, new_estimate);
        let ratio = speed_ratio(record.actual_speed, record.base_speed);
        let features = ShippingFeatures::from(record);
        let prediction = self.predict(&features, delay)?;

        Ok(ShippingSimulationResult {
            departure_date: record.departure_date,
            risk_level: classify_risk(record.wave_height_m, record.wind_speed_kmh, &self.thresholds),
            speed_status: classify_speed(ratio, &self.thresholds),
            speed_ratio: ratio,
            original_estimate,
            new_estimate,
            delay_hours: delay,
            predicted_delay_hours: prediction.value,
            prediction_source: prediction.source,
            input_features: features,
        })
    }

    /// One result per record, in input order. All-or-nothing.
    pub fn estimate_shipping(
        &self,
        records: &[HistoricalRecord],
    ) -> SimResult<Vec<ShippingSimulationResult>> {
        records.iter().map(|r| self.estimate_record(r)).collect()
    }

    /// Estimates for every voyage in the trailing window of `week_start`.
    pub fn estimate_shipping_window(
        &self,
        dataset: &HistoricalDataset,
        week_start: NaiveDate,
    ) -> SimResult<ShippingBatchResult> {
        let records = select_window(dataset, week_start);
        let results = self.estimate_shipping(records)?;
        debug!(week_start = %week_start, voyages = results.len(), "Shipping window estimated");
        Ok(ShippingBatchResult::new(Some(week_start), results, false))
    }

    /// Window estimates, or the default scenario when the window is empty.
    pub fn estimate_window_or_scenario(
        &self,
        dataset: &HistoricalDataset,
        week_start: NaiveDate,
        cargo_volume_ton: f64,
    ) -> SimResult<ShippingBatchResult> {
        let batch = self.estimate_shipping_window(dataset, week_start)?;
        if !batch.results.is_empty() {
            return Ok(batch);
        }
        let scenario = ShippingScenario::default_for_cargo(cargo_volume_ton);
        let record = scenario.to_record(week_start.and_time(chrono::NaiveTime::MIN));
        let result = self.estimate_record(&record)?;
        Ok(ShippingBatchResult::new(Some(week_start), vec![result], true))
    }
}
