//! HistoricalRecord: one observed voyage / operational event

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Weather status label that marks a record as extreme.
pub const EXTREME_STATUS: &str = "extreme";

/// Same label as written in the Indonesian operational datasets.
pub const EXTREME_STATUS_ID: &str = "ekstrem";

/// Case-insensitive check for an extreme weather status label.
pub fn is_extreme_status(status: &str) -> bool {
    let s = status.trim();
    s.eq_ignore_ascii_case(EXTREME_STATUS) || s.eq_ignore_ascii_case(EXTREME_STATUS_ID)
}

/// One historical shipment as loaded from the dataset provider.
///
/// Numeric cells that were empty or unparseable in the source are stored as
/// `f64::NAN`; the feature window builder skips them when averaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub departure_date: NaiveDateTime,
    /// Voyage distance (km)
    pub distance: f64,
    pub cargo_volume_ton: f64,
    pub capacity_ton: f64,
    pub rainfall_mm: f64,
    pub wind_speed_kmh: f64,
    pub wave_height_m: f64,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    /// Weather severity index
    pub wsi: f64,
    pub load_ratio: f64,
    /// Nominal vessel speed (km/h)
    pub base_speed: f64,
    /// Observed vessel speed (km/h)
    pub actual_speed: f64,
    /// Voyage duration (hours)
    pub duration: f64,
    pub weather_status: String,
    /// Originally scheduled arrival, when the source carries it
    #[serde(default)]
    pub arrival_estimate: Option<NaiveDateTime>,
    /// Revised arrival after departure, when the source carries it
    #[serde(default)]
    pub revised_arrival_estimate: Option<NaiveDateTime>,
}

impl HistoricalRecord {
    /// A calm-weather record at `departure_date` with every measurement zero.
    ///
    /// Mostly useful as a base for struct-update syntax.
    pub fn at(departure_date: NaiveDateTime) -> Self {
        Self {
            departure_date,
            distance: 0.0,
            cargo_volume_ton: 0.0,
            capacity_ton: 0.0,
            rainfall_mm: 0.0,
            wind_speed_kmh: 0.0,
            wave_height_m: 0.0,
            temperature_c: 0.0,
            humidity_percent: 0.0,
            wsi: 0.0,
            load_ratio: 0.0,
            base_speed: 0.0,
            actual_speed: 0.0,
            duration: 0.0,
            weather_status: "normal".to_string(),
            arrival_estimate: None,
            revised_arrival_estimate: None,
        }
    }

    /// Derived flag: weather status is "extreme" (case-insensitive).
    pub fn is_extreme(&self) -> bool {
        is_extreme_status(&self.weather_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_extreme_status_is_case_insensitive() {
        assert!(is_extreme_status("extreme"));
        assert!(is_extreme_status("EXTREME"));
        assert!(is_extreme_status("  Extreme "));
        assert!(is_extreme_status("Ekstrem"));
        assert!(!is_extreme_status("normal"));
        assert!(!is_extreme_status("extremely calm"));
    }

    #[test]
    fn test_record_derives_is_extreme() {
        let mut record = HistoricalRecord::at(ts());
        assert!(!record.is_extreme());
        record.weather_status = "Extreme".into();
        assert!(record.is_extreme());
    }
}
