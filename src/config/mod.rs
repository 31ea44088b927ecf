//! Application Configuration Module
//!
//! Rule thresholds, dataset and model locations, and LLM settings loaded from
//! TOML, replacing hardcoded constants with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `MVO_CONFIG` environment variable (path to TOML file)
//! 2. `mvo_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The loaded config is passed explicitly to the components that need it:
//!
//! ```ignore
//! let config = AppConfig::load();
//! let engine = RuleEngine::new(config.rules.clone(), config.knowledge_base.clone());
//! ```

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;
