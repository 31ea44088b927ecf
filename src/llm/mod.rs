//! LLM Backend Module
//!
//! Text completion used to narrate simulation results and answer general
//! chat messages. The numeric core never depends on it.
//!
//! ## Backends
//!
//! - **GeminiBackend**: Gemini `generateContent` REST API over `reqwest`
//! - **OfflineBackend**: used when no API key is configured; every call
//!   fails with [`LlmError::Unavailable`] so callers take their fallback path
//!
//! Deterministic narration for simulation results lives in [`template`] and
//! is what the chat router falls back to when a backend call fails.

mod gemini;
pub mod prompt;
pub mod template;

pub use gemini::GeminiBackend;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::LlmConfig;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response contained no text")]
    EmptyResponse,

    #[error("LLM response malformed: {0}")]
    Malformed(String),

    #[error("LLM backend unavailable: {0}")]
    Unavailable(String),
}

/// Unified trait for LLM backends
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Backend for deployments without an API key.
#[derive(Debug, Clone, Default)]
pub struct OfflineBackend;

#[async_trait]
impl LlmBackend for OfflineBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Unavailable("no API key configured".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "offline"
    }
}

/// Gemini when the configured API key variable is set, offline otherwise.
pub fn backend_from_config(config: &LlmConfig) -> Arc<dyn LlmBackend> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => match GeminiBackend::new(config, key) {
            Ok(backend) => {
                info!(model = %config.model, "Using Gemini backend");
                Arc::new(backend)
            }
            Err(e) => {
                warn!(error = %e, "Failed to build Gemini client, running offline");
                Arc::new(OfflineBackend)
            }
        },
        _ => {
            warn!(
                env = %config.api_key_env,
                "LLM API key not set, narration uses deterministic templates"
            );
            Arc::new(OfflineBackend)
        }
    }
}
