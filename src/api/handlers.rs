//! API handlers for chat and simulation endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::agent::ChatRouter;
use crate::features::parse_week_start;

// ============================================================================
// Shared State
// ============================================================================

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct ApiState {
    pub router: Arc<ChatRouter>,
}

impl ApiState {
    pub fn new(router: ChatRouter) -> Self {
        Self {
            router: Arc::new(router),
        }
    }
}

// ============================================================================
// Request / Response Bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "anonymous")]
    pub user_id: String,
}

fn anonymous() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct MiningSimulationRequest {
    pub target_ton: Option<f64>,
    /// `YYYY-MM-DD`; today when absent
    pub week_start: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShippingSimulationRequest {
    pub week_start: Option<String>,
    /// Cargo for the default scenario when the window is empty
    pub cargo_volume_ton: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub dataset_records: usize,
    pub prediction_source: String,
    pub llm_backend: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn root() -> &'static str {
    "Mining Value Optimizer is running. POST /chat with {\"message\": ..., \"user_id\": ...}."
}

/// GET /health
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let sim = state.router.simulator();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        dataset_records: sim.dataset().len(),
        prediction_source: sim.predictor().source().to_string(),
        llm_backend: state.router.llm_backend_name(),
    })
}

/// POST /chat
pub async fn chat(State(state): State<ApiState>, Json(req): Json<ChatRequest>) -> Response {
    let reply = state.router.handle_message(&req.message, &req.user_id).await;
    Json(reply).into_response()
}

/// POST /simulate: like /chat but rejects non-simulation messages.
pub async fn simulate(State(state): State<ApiState>, Json(req): Json<ChatRequest>) -> Response {
    match state.router.simulate(&req.message, &req.user_id).await {
        Some(reply) => Json(reply).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "type": "error",
                "answer": "Message is not a simulation request.",
            })),
        )
            .into_response(),
    }
}

/// POST /api/v1/simulations/mining
pub async fn simulate_mining(
    State(state): State<ApiState>,
    Json(req): Json<MiningSimulationRequest>,
) -> Response {
    let router = &state.router;
    let week_start = match req.week_start.as_deref() {
        Some(raw) => match parse_week_start(raw) {
            Ok(d) => d,
            Err(e) => return ApiErrorResponse::from_simulation_error(&e),
        },
        None => router.today(),
    };
    let target_ton = req.target_ton.unwrap_or(router.default_target_ton());
    debug!(target_ton, week_start = %week_start, "REST mining simulation");

    match router.simulator().run_mining(target_ton, week_start) {
        Ok(result) => ApiResponse::ok(result),
        Err(e) => ApiErrorResponse::from_simulation_error(&e),
    }
}

/// POST /api/v1/simulations/shipping
pub async fn simulate_shipping(
    State(state): State<ApiState>,
    Json(req): Json<ShippingSimulationRequest>,
) -> Response {
    let router = &state.router;
    let week_start = match req.week_start.as_deref() {
        Some(raw) => match parse_week_start(raw) {
            Ok(d) => d,
            Err(e) => return ApiErrorResponse::from_simulation_error(&e),
        },
        None => router.today(),
    };
    let cargo = req.cargo_volume_ton.unwrap_or(router.default_target_ton());

    match router.simulator().run_shipping(week_start, cargo) {
        Ok(batch) => ApiResponse::ok(batch),
        Err(e) => ApiErrorResponse::from_simulation_error(&e),
    }
}

/// GET /api/v1/dataset
pub async fn dataset_summary(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(state.router.simulator().dataset().summary())
}

/// Fallback for unknown paths.
pub async fn not_found(uri: axum::http::Uri) -> Response {
    ApiErrorResponse::not_found(format!("No route for {}", uri.path()))
}
