//! FeatureVector: the fixed 14-feature schema consumed by predictors and rules

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of features in the mining schema.
pub const FEATURE_COUNT: usize = 14;

/// Canonical feature order. Model input vectors follow this order exactly.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "distance",
    "capacity_ton",
    "rainfall_mm",
    "wind_speed_kmh",
    "wave_height_m",
    "temperature_c",
    "humidity_percent",
    "wsi",
    "load_ratio",
    "base_speed",
    "weather_factor",
    "actual_speed",
    "duration",
    "is_extreme",
];

/// Window-averaged features. Every field is finite; 0.0 stands for
/// "no data in the window".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureVector {
    pub distance: f64,
    pub capacity_ton: f64,
    pub rainfall_mm: f64,
    pub wind_speed_kmh: f64,
    pub wave_height_m: f64,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub wsi: f64,
    pub load_ratio: f64,
    pub base_speed: f64,
    /// Weighted composite of rainfall, wind and wave means
    pub weather_factor: f64,
    pub actual_speed: f64,
    pub duration: f64,
    /// Fraction of window records with extreme weather (0.0-1.0)
    pub is_extreme: f64,
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.distance,
            self.capacity_ton,
            self.rainfall_mm,
            self.wind_speed_kmh,
            self.wave_height_m,
            self.temperature_c,
            self.humidity_percent,
            self.wsi,
            self.load_ratio,
            self.base_speed,
            self.weather_factor,
            self.actual_speed,
            self.duration,
            self.is_extreme,
        ]
    }

    /// Look up a feature by schema name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.to_array()[idx])
    }

    /// (name, value) pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }

    pub fn is_all_zero(&self) -> bool {
        self.to_array().iter().all(|v| *v == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Ratio of actual to base speed; 1.0 when no base speed is known.
    pub fn fleet_health_index(&self) -> f64 {
        if self.base_speed > 0.0 {
            self.actual_speed / self.base_speed
        } else {
            1.0
        }
    }
}

/// Feature vector plus the window it was computed over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWindow {
    pub features: FeatureVector,
    /// First day of the window (inclusive)
    pub window_start: NaiveDate,
    /// Reference week start (exclusive)
    pub window_end: NaiveDate,
    /// Number of records that fell inside the window
    pub shipments: usize,
}

impl FeatureWindow {
    /// False when the window held no records ("insufficient history").
    pub fn has_history(&self) -> bool {
        self.shipments > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_order_matches_names() {
        let fv = FeatureVector {
            distance: 1.0,
            capacity_ton: 2.0,
            rainfall_mm: 3.0,
            wind_speed_kmh: 4.0,
            wave_height_m: 5.0,
            temperature_c: 6.0,
            humidity_percent: 7.0,
            wsi: 8.0,
            load_ratio: 9.0,
            base_speed: 10.0,
            weather_factor: 11.0,
            actual_speed: 12.0,
            duration: 13.0,
            is_extreme: 14.0,
        };
        for (idx, (name, value)) in fv.iter().enumerate() {
            assert_eq!(name, FEATURE_NAMES[idx]);
            assert_eq!(value, (idx + 1) as f64);
        }
        assert_eq!(fv.get("weather_factor"), Some(11.0));
        assert_eq!(fv.get("shipments"), None);
    }

    #[test]
    fn test_serialized_keys_are_exactly_the_schema() {
        let json = serde_json::to_value(FeatureVector::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FEATURE_COUNT);
        for name in FEATURE_NAMES {
            assert!(obj.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn test_unknown_key_rejected_on_deserialize() {
        let mut json = serde_json::to_value(FeatureVector::default()).unwrap();
        json["shipments"] = serde_json::json!(3);
        assert!(serde_json::from_value::<FeatureVector>(json).is_err());
    }

    #[test]
    fn test_fleet_health_index_without_base_speed() {
        let fv = FeatureVector {
            actual_speed: 12.0,
            ..Default::default()
        };
        assert_eq!(fv.fleet_health_index(), 1.0);

        let fv = FeatureVector {
            actual_speed: 50.0,
            base_speed: 100.0,
            ..Default::default()
        };
        assert!((fv.fleet_health_index() - 0.5).abs() < 1e-12);
    }
}
