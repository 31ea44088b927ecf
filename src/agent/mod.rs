//! Chat agent: intent classification, request parsing and routing
//!
//! Simulation requests run the numeric core and are narrated by the LLM,
//! with deterministic template narration when the LLM fails. Everything
//! else is forwarded to the LLM as plain chat.

pub mod intent;
pub mod request;
mod router;

pub use intent::{classify, Intent, SimulationKind};
pub use request::{parse_simulation_request, SimulationRequest};
pub use router::{system_clock, ChatReply, ChatRouter, Clock};
