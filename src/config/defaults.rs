//! System-wide default constants.
//!
//! Values that are not operator-tunable live here; tunable thresholds have
//! their defaults in `app_config.rs` and reference these where they overlap.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MVO_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "mvo_config.toml";

/// Default HTTP bind address.
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

// ============================================================================
// Feature Window
// ============================================================================

/// Trailing window length (days). The window is `[week_start - 28d, week_start)`.
pub const WINDOW_DAYS: i64 = 28;

/// Weather factor weights: `rainfall*0.2 + wind*0.4 + wave*0.4`.
pub const WEATHER_WEIGHT_RAINFALL: f64 = 0.2;
pub const WEATHER_WEIGHT_WIND: f64 = 0.4;
pub const WEATHER_WEIGHT_WAVE: f64 = 0.4;

// ============================================================================
// Prediction
// ============================================================================

/// Heuristic fallback: `predicted = capacity_ton * 0.8`.
pub const HEURISTIC_CAPACITY_FACTOR: f64 = 0.8;

/// Target tonnage used when a chat message carries no number.
pub const DEFAULT_TARGET_TON: f64 = 10_000.0;

// ============================================================================
// Shipping Default Scenario
// ============================================================================

/// Single-voyage scenario used when a shipping request has no history.
pub const SCENARIO_DISTANCE: f64 = 100.0;
pub const SCENARIO_CAPACITY_TON: f64 = 5_000.0;
pub const SCENARIO_RAINFALL_MM: f64 = 0.0;
pub const SCENARIO_WIND_SPEED_KMH: f64 = 10.0;
pub const SCENARIO_WAVE_HEIGHT_M: f64 = 1.0;
pub const SCENARIO_TEMPERATURE_C: f64 = 25.0;
pub const SCENARIO_HUMIDITY_PERCENT: f64 = 60.0;

// ============================================================================
// LLM
// ============================================================================

/// Default Gemini model name.
pub const LLM_MODEL: &str = "gemini-2.5-pro";

/// Gemini REST base URL (v1beta `generateContent`).
pub const LLM_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the API key. The key itself never lives in config.
pub const LLM_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Maximum time to wait for a single completion (seconds).
pub const LLM_TIMEOUT_SECS: u64 = 60;
