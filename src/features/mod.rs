//! Feature Window Builder
//!
//! Turns the historical dataset and a reference week start into the fixed
//! 14-feature vector consumed by predictors and the rule engine.
//!
//! ## Window
//!
//! Records with `week_start - 28d <= departure_date < week_start` are
//! selected. The boundary date itself is excluded.
//!
//! ## Aggregation
//!
//! Every feature is the arithmetic mean over the window, skipping missing
//! cells. An empty window, or a column with no values in the window, yields
//! 0.0. No NaN ever leaves this module.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::config::defaults::{
    WEATHER_WEIGHT_RAINFALL, WEATHER_WEIGHT_WAVE, WEATHER_WEIGHT_WIND, WINDOW_DAYS,
};
use crate::dataset::HistoricalDataset;
use crate::error::{SimResult, SimulationError};
use crate::types::{FeatureVector, FeatureWindow, HistoricalRecord};

/// Parse a week start supplied as text (`YYYY-MM-DD`, time part ignored).
///
/// Dates whose trailing window would fall off the start of the calendar are
/// rejected as invalid input.
pub fn parse_week_start(raw: &str) -> SimResult<NaiveDate> {
    let s = raw.trim();
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| crate::dataset::parse_timestamp(s).map(|dt| dt.date()))
        .ok_or_else(|| SimulationError::InvalidInput(format!("unparseable week_start '{raw}'")))?;
    if date.checked_sub_signed(Duration::days(WINDOW_DAYS)).is_none() {
        return Err(SimulationError::InvalidInput(format!(
            "week_start '{raw}' is out of range"
        )));
    }
    Ok(date)
}

/// Half-open datetime bounds of the trailing window for `week_start`.
///
/// The lower bound saturates at the earliest representable date.
pub fn window_bounds(week_start: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let end = week_start.and_time(NaiveTime::MIN);
    let start = end
        .checked_sub_signed(Duration::days(WINDOW_DAYS))
        .unwrap_or_else(|| NaiveDate::MIN.and_time(NaiveTime::MIN));
    (start, end)
}

/// Records inside the trailing window of `week_start`.
pub fn select_window(dataset: &HistoricalDataset, week_start: NaiveDate) -> &[HistoricalRecord] {
    let (start, end) = window_bounds(week_start);
    dataset.window(start, end)
}

/// Build the feature vector together with its window metadata.
pub fn build_window(dataset: &HistoricalDataset, week_start: NaiveDate) -> FeatureWindow {
    let (start, _) = window_bounds(week_start);
    let records = select_window(dataset, week_start);
    let features = aggregate(records);

    debug!(
        week_start = %week_start,
        shipments = records.len(),
        weather_factor = features.weather_factor,
        "Built feature window"
    );

    FeatureWindow {
        features,
        window_start: start.date(),
        window_end: week_start,
        shipments: records.len(),
    }
}

/// `build_features(dataset, week_start) -> FeatureVector`
pub fn build_features(dataset: &HistoricalDataset, week_start: NaiveDate) -> FeatureVector {
    build_window(dataset, week_start).features
}

/// Same as [`build_features`] with the week start given as text.
pub fn build_features_from_str(
    dataset: &HistoricalDataset,
    week_start: &str,
) -> SimResult<FeatureVector> {
    Ok(build_features(dataset, parse_week_start(week_start)?))
}

/// Mean of the finite values; 0.0 when there are none.
fn finite_mean(values: impl Iterator<Item = f64>) -> f64 {
    let finite: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    let mean = finite.mean();
    if mean.is_finite() {
        mean
    } else {
        0.0
    }
}

fn aggregate(records: &[HistoricalRecord]) -> FeatureVector {
    let mean_of = |f: fn(&HistoricalRecord) -> f64| finite_mean(records.iter().map(f));

    let rainfall_mm = mean_of(|r| r.rainfall_mm);
    let wind_speed_kmh = mean_of(|r| r.wind_speed_kmh);
    let wave_height_m = mean_of(|r| r.wave_height_m);

    FeatureVector {
        distance: mean_of(|r| r.distance),
        capacity_ton: mean_of(|r| r.capacity_ton),
        rainfall_mm,
        wind_speed_kmh,
        wave_height_m,
        temperature_c: mean_of(|r| r.temperature_c),
        humidity_percent: mean_of(|r| r.humidity_percent),
        wsi: mean_of(|r| r.wsi),
        load_ratio: mean_of(|r| r.load_ratio),
        base_speed: mean_of(|r| r.base_speed),
        weather_factor: weather_factor(rainfall_mm, wind_speed_kmh, wave_height_m),
        actual_speed: mean_of(|r| r.actual_speed),
        duration: mean_of(|r| r.duration),
        is_extreme: mean_of(|r| if r.is_extreme() { 1.0 } else { 0.0 }),
    }
}

/// `rainfall*0.2 + wind*0.4 + wave*0.4`
pub fn weather_factor(rainfall_mean: f64, wind_mean: f64, wave_mean: f64) -> f64 {
    rainfall_mean * WEATHER_WEIGHT_RAINFALL
        + wind_mean * WEATHER_WEIGHT_WIND
        + wave_mean * WEATHER_WEIGHT_WAVE
}
