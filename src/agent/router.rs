//! ChatRouter: routes a chat message to the simulation core or the LLM

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::intent::{classify, Intent, SimulationKind};
use super::request::{parse_simulation_request, SimulationRequest};
use crate::error::SimulationError;
use crate::llm::{prompt, template, LlmBackend};
use crate::simulation::Simulator;
use crate::types::SimulationResult;

/// Source of "today" for requests without a date.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Local calendar date.
pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Local::now().date_naive())
}

/// Reply to one chat message, tagged with `type` when serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatReply {
    Simulation {
        request: SimulationRequest,
        result: SimulationResult,
        answer: String,
        /// Backend that produced `answer` ("template" after an LLM failure)
        narrated_by: String,
    },
    Llm {
        answer: String,
    },
    Error {
        answer: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl ChatReply {
    fn error(answer: impl Into<String>, code: Option<&str>) -> Self {
        ChatReply::Error {
            answer: answer.into(),
            code: code.map(str::to_string),
        }
    }

    fn from_simulation_error(e: &SimulationError) -> Self {
        Self::error(format!("Simulation error: {e}"), Some(e.code()))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ChatReply::Error { .. })
    }
}

#[derive(Clone)]
pub struct ChatRouter {
    simulator: Arc<Simulator>,
    llm: Arc<dyn LlmBackend>,
    default_target_ton: f64,
    clock: Clock,
}

impl ChatRouter {
    pub fn new(
        simulator: Arc<Simulator>,
        llm: Arc<dyn LlmBackend>,
        default_target_ton: f64,
        clock: Clock,
    ) -> Self {
        Self {
            simulator,
            llm,
            default_target_ton,
            clock,
        }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn llm_backend_name(&self) -> &'static str {
        self.llm.backend_name()
    }

    pub fn default_target_ton(&self) -> f64 {
        self.default_target_ton
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Full chat handling: simulation requests run the core, everything else
    /// goes to the LLM.
    pub async fn handle_message(&self, message: &str, user_id: &str) -> ChatReply {
        if message.trim().is_empty() {
            return ChatReply::error("Message must not be empty.", Some("INVALID_INPUT"));
        }
        match classify(message) {
            Intent::Simulation(kind) => self.run_simulation(kind, message, user_id).await,
            Intent::General => self.ask_llm(message, user_id).await,
        }
    }

    /// Simulation-only handling; `None` when the message is not a
    /// simulation request.
    pub async fn simulate(&self, message: &str, user_id: &str) -> Option<ChatReply> {
        match classify(message) {
            Intent::Simulation(kind) => Some(self.run_simulation(kind, message, user_id).await),
            Intent::General => None,
        }
    }

    async fn run_simulation(&self, kind: SimulationKind, message: &str, user_id: &str) -> ChatReply {
        let request = parse_simulation_request(message, (self.clock)(), self.default_target_ton);
        info!(
            user_id = %user_id,
            kind = ?kind,
            target_ton = %request.target_ton,
            week_start = %request.week_start,
            "Chat simulation request"
        );

        let outcome = match kind {
            SimulationKind::Mining => self
                .simulator
                .run_mining(request.target_ton, request.week_start)
                .map(|r| {
                    let prompt = prompt::mining_prompt(&r, message);
                    let fallback = template::narrate_mining(&r);
                    (SimulationResult::Mining(r), prompt, fallback)
                }),
            SimulationKind::Shipping => self
                .simulator
                .run_shipping(request.week_start, request.target_ton)
                .map(|b| {
                    let prompt = prompt::shipping_prompt(&b, message);
                    let fallback = template::narrate_shipping(&b);
                    (SimulationResult::Shipping(b), prompt, fallback)
                }),
        };

        let (result, prompt, fallback) = match outcome {
            Ok(parts) => parts,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Simulation failed");
                return ChatReply::from_simulation_error(&e);
            }
        };

        let (answer, narrated_by) = match self.llm.generate(&prompt).await {
            Ok(text) => (text, self.llm.backend_name().to_string()),
            Err(e) => {
                warn!(backend = self.llm.backend_name(), error = %e, "Narration failed, using template");
                (fallback, "template".to_string())
            }
        };

        ChatReply::Simulation {
            request,
            result,
            answer,
            narrated_by,
        }
    }

    async fn ask_llm(&self, message: &str, user_id: &str) -> ChatReply {
        match self.llm.generate(&prompt::general_prompt(message)).await {
            Ok(answer) => ChatReply::Llm { answer },
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "LLM call failed");
                ChatReply::error(format!("Sorry, the assistant is unavailable: {e}"), None)
            }
        }
    }
}
