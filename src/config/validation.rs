//! Config validation: unknown-key detection with "did you mean?" suggestions
//! and plausibility checks on threshold values.
//!
//! The raw TOML is first walked as a `toml::Value` tree and every dotted key
//! is compared against the known field set. Unknown keys only produce
//! warnings, so an old config with a stray key still loads.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of `AppConfig`.
///
/// Kept by hand in step with `app_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        // [dataset]
        "dataset",
        "dataset.csv_path",
        // [model]
        "model",
        "model.mining_model_path",
        "model.shipping_model_path",
        "model.fallback_on_predictor_error",
        // [rules]
        "rules",
        "rules.weather_severe",
        "rules.weather_moderate",
        "rules.fleet_health_low",
        "rules.fleet_health_degraded",
        "rules.extreme_weather_fraction",
        "rules.load_ratio_high",
        "rules.achievement_on_track_percent",
        // [knowledge_base]
        "knowledge_base",
        "knowledge_base.enabled",
        "knowledge_base.wind_speed_kmh",
        "knowledge_base.wave_height_m",
        "knowledge_base.rainfall_mm",
        "knowledge_base.min_shipments",
        // [shipping]
        "shipping",
        "shipping.high_wave_height_m",
        "shipping.high_wind_speed_kmh",
        "shipping.medium_wave_height_m",
        "shipping.medium_wind_speed_kmh",
        "shipping.slow_speed_ratio",
        "shipping.fast_speed_ratio",
        // [llm]
        "llm",
        "llm.model",
        "llm.endpoint",
        "llm.api_key_env",
        "llm.timeout_secs",
        // [chat]
        "chat",
        "chat.default_target_ton",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Collect all dotted key paths of a `toml::Value` tree.
///
/// `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };
    let mut keys = Vec::new();
    for (k, v) in table {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        if v.is_table() {
            let nested = walk_toml_keys(v, &path);
            keys.push(path);
            keys.extend(nested);
        } else {
            keys.push(path);
        }
    }
    keys
}

// ============================================================================
// Edit Distance
// ============================================================================

/// Levenshtein distance over Unicode scalar values.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}

/// Closest known key within edit distance 3, if any.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (*k, edit_distance(unknown, k)))
        .filter(|(_, d)| *d <= 3)
        .min_by(|(ka, da), (kb, db)| da.cmp(db).then_with(|| ka.cmp(kb)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Warnings for every key in `raw_toml` that `AppConfig` does not know.
///
/// Parse errors yield no warnings; serde reports them afterwards.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Plausibility Checks
// ============================================================================

/// Warnings for values that are legal but unlikely to be intended.
pub fn validate_plausible_ranges(config: &super::AppConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut check = |field: &str, value: f64, lo: f64, hi: f64| {
        if value < lo || value > hi {
            warnings.push(ValidationWarning {
                field: field.to_string(),
                message: format!("{field} = {value} is outside the typical range ({lo}-{hi})"),
                suggestion: None,
            });
        }
    };

    check(
        "rules.extreme_weather_fraction",
        config.rules.extreme_weather_fraction,
        0.0,
        1.0,
    );
    check(
        "rules.fleet_health_degraded",
        config.rules.fleet_health_degraded,
        0.0,
        2.0,
    );
    check(
        "rules.achievement_on_track_percent",
        config.rules.achievement_on_track_percent,
        0.0,
        200.0,
    );
    check(
        "knowledge_base.wind_speed_kmh",
        config.knowledge_base.wind_speed_kmh,
        0.0,
        250.0,
    );
    check(
        "knowledge_base.wave_height_m",
        config.knowledge_base.wave_height_m,
        0.0,
        30.0,
    );

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("rules", "rules"), 0);
        assert_eq!(edit_distance("wether_severe", "weather_severe"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [rules]
            weather_severe = 70.0
            [llm]
            model = "x"
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"rules".to_string()));
        assert!(keys.contains(&"rules.weather_severe".to_string()));
        assert!(keys.contains(&"llm.model".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let warnings = validate_unknown_keys("[rules]\nwether_severe = 70.0\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "rules.wether_severe");
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("rules.weather_severe")
        );
    }

    #[test]
    fn test_valid_keys_produce_no_warnings() {
        let toml_str = r#"
[server]
addr = "127.0.0.1:9000"

[knowledge_base]
min_shipments = 5

[chat]
default_target_ton = 12000.0
"#;
        assert!(validate_unknown_keys(toml_str).is_empty());
    }

    #[test]
    fn test_garbage_key_has_no_suggestion() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key", &known).is_none());
    }

    #[test]
    fn test_defaults_are_plausible() {
        assert!(validate_plausible_ranges(&super::super::AppConfig::default()).is_empty());
    }

    #[test]
    fn test_fraction_above_one_is_flagged() {
        let mut config = super::super::AppConfig::default();
        config.rules.extreme_weather_fraction = 1.5;
        let warnings = validate_plausible_ranges(&config);
        assert!(warnings
            .iter()
            .any(|w| w.field == "rules.extreme_weather_fraction"));
    }
}
