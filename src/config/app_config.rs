//! Application Configuration - rule thresholds, dataset and model locations,
//! LLM settings as operator-tunable TOML values
//!
//! Each struct implements `Default` with the values the simulation core was
//! calibrated with, so running without a config file changes nothing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a simulation deployment.
///
/// Load with `AppConfig::load()` which searches:
/// 1. `$MVO_CONFIG` env var
/// 2. `./mvo_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Historical dataset location
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Regression model locations and failure policy
    #[serde(default)]
    pub model: ModelConfig,

    /// Primary rule battery thresholds
    #[serde(default)]
    pub rules: RuleThresholds,

    /// Secondary knowledge-base rule thresholds
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseThresholds,

    /// Shipping risk and speed classification bands
    #[serde(default)]
    pub shipping: ShippingThresholds,

    /// Narration backend
    #[serde(default)]
    pub llm: LlmConfig,

    /// Chat request defaults
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order:
    /// 1. `$MVO_CONFIG` environment variable
    /// 2. `./mvo_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from MVO_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from MVO_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "MVO_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No config file found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path. Unknown keys are logged as
    /// warnings; inconsistent thresholds are an error.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        for w in super::validation::validate_plausible_ranges(&config) {
            warn!("{}", w);
        }
        Ok(config)
    }

    /// Serialize the config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Severe weather must be >= moderate weather
    /// - Degraded fleet health must be >= low fleet health
    /// - High shipping risk bands must be >= medium bands
    /// - Fast speed ratio must be >= slow speed ratio
    /// - Default target tonnage must be positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.rules;
        let s = &self.shipping;
        let mut errors: Vec<String> = Vec::new();

        Self::check_escalation(
            r.weather_moderate,
            r.weather_severe,
            "rules.weather",
            &mut errors,
        );
        Self::check_escalation(
            r.fleet_health_low,
            r.fleet_health_degraded,
            "rules.fleet_health",
            &mut errors,
        );
        Self::check_escalation(
            s.medium_wave_height_m,
            s.high_wave_height_m,
            "shipping.wave_height",
            &mut errors,
        );
        Self::check_escalation(
            s.medium_wind_speed_kmh,
            s.high_wind_speed_kmh,
            "shipping.wind_speed",
            &mut errors,
        );
        Self::check_escalation(
            s.slow_speed_ratio,
            s.fast_speed_ratio,
            "shipping.speed_ratio",
            &mut errors,
        );

        for (name, value) in [
            ("rules.extreme_weather_fraction", r.extreme_weather_fraction),
            ("rules.load_ratio_high", r.load_ratio_high),
            ("rules.achievement_on_track_percent", r.achievement_on_track_percent),
            ("knowledge_base.wind_speed_kmh", self.knowledge_base.wind_speed_kmh),
            ("knowledge_base.wave_height_m", self.knowledge_base.wave_height_m),
            ("knowledge_base.rainfall_mm", self.knowledge_base.rainfall_mm),
        ] {
            if !value.is_finite() {
                errors.push(format!("{name}: value must be finite (got {value})"));
            }
        }

        if !(self.chat.default_target_ton.is_finite() && self.chat.default_target_ton > 0.0) {
            errors.push(format!(
                "chat.default_target_ton ({}) must be a positive number",
                self.chat.default_target_ton
            ));
        }

        if self.llm.timeout_secs == 0 {
            errors.push("llm.timeout_secs must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(lower: f64, upper: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass
        if !lower.is_finite() || !upper.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got lower={lower}, upper={upper})"
            ));
            return;
        }
        if upper < lower {
            errors.push(format!(
                "{name}: upper band ({upper:.3}) must be >= lower band ({lower:.3})"
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Server / Dataset / Model
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address. Overridden by `MVO_SERVER_ADDR` or `--addr`.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::DEFAULT_SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

/// Historical dataset location. Without a path the server starts with an
/// empty dataset and every window reports insufficient history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
}

/// Regression model files (JSON linear models). Absent paths select the
/// heuristic fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub mining_model_path: Option<PathBuf>,

    #[serde(default)]
    pub shipping_model_path: Option<PathBuf>,

    /// Re-run with the heuristic when the model fails during inference.
    /// Off by default: predictor failures propagate.
    #[serde(default)]
    pub fallback_on_predictor_error: bool,
}

// ============================================================================
// Rule Thresholds
// ============================================================================

/// Primary rule battery thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// weather_factor above this fires the severe-weather rule
    #[serde(default = "default_weather_severe")]
    pub weather_severe: f64,

    /// weather_factor above this (and not severe) fires the moderate rule
    #[serde(default = "default_weather_moderate")]
    pub weather_moderate: f64,

    /// Fleet health index below this is "low"
    #[serde(default = "default_fleet_health_low")]
    pub fleet_health_low: f64,

    /// Fleet health index below this (and not low) is "degraded"
    #[serde(default = "default_fleet_health_degraded")]
    pub fleet_health_degraded: f64,

    /// Fraction of extreme-weather records above which a warning is added
    #[serde(default = "default_extreme_weather_fraction")]
    pub extreme_weather_fraction: f64,

    /// Mean load ratio above which an over-utilization warning is added
    #[serde(default = "default_load_ratio_high")]
    pub load_ratio_high: f64,

    /// Achievement percent at or above this is "on track"
    #[serde(default = "default_achievement_on_track")]
    pub achievement_on_track_percent: f64,
}

fn default_weather_severe() -> f64 {
    70.0
}
fn default_weather_moderate() -> f64 {
    40.0
}
fn default_fleet_health_low() -> f64 {
    0.6
}
fn default_fleet_health_degraded() -> f64 {
    0.8
}
fn default_extreme_weather_fraction() -> f64 {
    0.3
}
fn default_load_ratio_high() -> f64 {
    1.15
}
fn default_achievement_on_track() -> f64 {
    85.0
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            weather_severe: default_weather_severe(),
            weather_moderate: default_weather_moderate(),
            fleet_health_low: default_fleet_health_low(),
            fleet_health_degraded: default_fleet_health_degraded(),
            extreme_weather_fraction: default_extreme_weather_fraction(),
            load_ratio_high: default_load_ratio_high(),
            achievement_on_track_percent: default_achievement_on_track(),
        }
    }
}

/// Secondary knowledge-base rule thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseThresholds {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_kb_wind")]
    pub wind_speed_kmh: f64,

    #[serde(default = "default_kb_wave")]
    pub wave_height_m: f64,

    #[serde(default = "default_kb_rainfall")]
    pub rainfall_mm: f64,

    /// Fewer shipments than this in the window fires the low-shipments rule
    #[serde(default = "default_kb_min_shipments")]
    pub min_shipments: usize,
}

fn default_true() -> bool {
    true
}
fn default_kb_wind() -> f64 {
    45.0
}
fn default_kb_wave() -> f64 {
    3.0
}
fn default_kb_rainfall() -> f64 {
    80.0
}
fn default_kb_min_shipments() -> usize {
    3
}

impl Default for KnowledgeBaseThresholds {
    fn default() -> Self {
        Self {
            enabled: true,
            wind_speed_kmh: default_kb_wind(),
            wave_height_m: default_kb_wave(),
            rainfall_mm: default_kb_rainfall(),
            min_shipments: default_kb_min_shipments(),
        }
    }
}

/// Per-voyage shipping classification bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingThresholds {
    #[serde(default = "default_high_wave")]
    pub high_wave_height_m: f64,

    #[serde(default = "default_high_wind")]
    pub high_wind_speed_kmh: f64,

    #[serde(default = "default_medium_wave")]
    pub medium_wave_height_m: f64,

    #[serde(default = "default_medium_wind")]
    pub medium_wind_speed_kmh: f64,

    /// actual/base speed below this is "Slow"
    #[serde(default = "default_slow_ratio")]
    pub slow_speed_ratio: f64,

    /// actual/base speed above this is "Fast"
    #[serde(default = "default_fast_ratio")]
    pub fast_speed_ratio: f64,
}

fn default_high_wave() -> f64 {
    2.0
}
fn default_high_wind() -> f64 {
    30.0
}
fn default_medium_wave() -> f64 {
    1.0
}
fn default_medium_wind() -> f64 {
    20.0
}
fn default_slow_ratio() -> f64 {
    0.8
}
fn default_fast_ratio() -> f64 {
    1.2
}

impl Default for ShippingThresholds {
    fn default() -> Self {
        Self {
            high_wave_height_m: default_high_wave(),
            high_wind_speed_kmh: default_high_wind(),
            medium_wave_height_m: default_medium_wave(),
            medium_wind_speed_kmh: default_medium_wind(),
            slow_speed_ratio: default_slow_ratio(),
            fast_speed_ratio: default_fast_ratio(),
        }
    }
}

// ============================================================================
// LLM / Chat
// ============================================================================

/// Narration backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Name of the environment variable that holds the API key
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_model() -> String {
    defaults::LLM_MODEL.to_string()
}
fn default_llm_endpoint() -> String {
    defaults::LLM_ENDPOINT.to_string()
}
fn default_llm_api_key_env() -> String {
    defaults::LLM_API_KEY_ENV.to_string()
}
fn default_llm_timeout() -> u64 {
    defaults::LLM_TIMEOUT_SECS
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            api_key_env: default_llm_api_key_env(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_target_ton")]
    pub default_target_ton: f64,
}

fn default_target_ton() -> f64 {
    defaults::DEFAULT_TARGET_TON
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_target_ton: default_target_ton(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
