//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the chat and /api/v1/* endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port. The LLM is replaced by a stub backend.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{NaiveDate, NaiveDateTime};
use tower::ServiceExt;

use mining_value::agent::ChatRouter;
use mining_value::api::{create_app, ApiState};
use mining_value::dataset::HistoricalDataset;
use mining_value::llm::{LlmBackend, LlmError, OfflineBackend};
use mining_value::simulation::Simulator;
use mining_value::types::HistoricalRecord;

struct StubBackend;

#[async_trait]
impl LlmBackend for StubBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok("stub narration".to_string())
    }

    fn backend_name(&self) -> &'static str {
        "stub"
    }
}

fn sample_dataset() -> HistoricalDataset {
    let departure =
        NaiveDateTime::parse_from_str("2024-03-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    HistoricalDataset::from_records(vec![HistoricalRecord {
        distance: 120.0,
        cargo_volume_ton: 5_000.0,
        capacity_ton: 6_000.0,
        rainfall_mm: 10.0,
        wind_speed_kmh: 35.0,
        wave_height_m: 2.5,
        base_speed: 20.0,
        actual_speed: 15.0,
        ..HistoricalRecord::at(departure)
    }])
}

fn create_test_state(llm: Arc<dyn LlmBackend>) -> ApiState {
    ApiState::new(ChatRouter::new(
        Arc::new(Simulator::with_defaults(sample_dataset())),
        llm,
        10_000.0,
        Arc::new(|| NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()),
    ))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_get_endpoints_return_200() {
    for endpoint in ["/", "/health", "/api/v1/dataset"] {
        let app = create_app(create_test_state(Arc::new(StubBackend)));
        let resp = app
            .oneshot(Request::builder().uri(endpoint).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(
            resp.status().is_success(),
            "GET {endpoint} returned status {}",
            resp.status()
        );
    }
}

#[tokio::test]
async fn test_health_reports_components() {
    let app = create_app(create_test_state(Arc::new(OfflineBackend)));
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = json_body(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["dataset_records"], 1);
    assert_eq!(json["prediction_source"], "heuristic");
    assert_eq!(json["llm_backend"], "offline");
}

#[tokio::test]
async fn test_chat_mining_simulation() {
    let app = create_app(create_test_state(Arc::new(StubBackend)));
    let resp = app
        .oneshot(post_json(
            "/chat",
            serde_json::json!({"message": "simulasi produksi 2024-03-04 target 12000", "user_id": "ops"}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_body(resp).await;
    assert_eq!(json["type"], "simulation");
    assert_eq!(json["request"]["target_ton"], 12_000.0);
    assert_eq!(json["result"]["kind"], "mining");
    assert_eq!(json["result"]["predicted_production_ton"], 4_800.0);
    assert_eq!(json["answer"], "stub narration");
    assert_eq!(json["narrated_by"], "stub");
}

#[tokio::test]
async fn test_chat_shipping_falls_back_to_template() {
    let app = create_app(create_test_state(Arc::new(OfflineBackend)));
    let resp = app
        .oneshot(post_json(
            "/chat",
            serde_json::json!({"message": "cek delay kapal minggu 2024-03-04"}),
        ))
        .await
        .unwrap();

    let json = json_body(resp).await;
    assert_eq!(json["type"], "simulation");
    assert_eq!(json["result"]["kind"], "shipping");
    assert_eq!(json["result"]["results"][0]["risk_level"], "High");
    assert_eq!(json["narrated_by"], "template");
}

#[tokio::test]
async fn test_simulate_rejects_general_message() {
    let app = create_app(create_test_state(Arc::new(StubBackend)));
    let resp = app
        .oneshot(post_json("/simulate", serde_json::json!({"message": "hello there"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_v1_mining_returns_envelope() {
    let app = create_app(create_test_state(Arc::new(StubBackend)));
    let resp = app
        .oneshot(post_json(
            "/api/v1/simulations/mining",
            serde_json::json!({"target_ton": 6000.0, "week_start": "2024-03-04"}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_body(resp).await;
    assert!(json["meta"]["timestamp"].is_string());
    assert_eq!(json["data"]["window"]["shipments"], 1);
    assert_eq!(json["data"]["achievement_percent"].as_f64().map(f64::round), Some(80.0));
}

#[tokio::test]
async fn test_v1_mining_bad_input_is_400() {
    for body in [
        serde_json::json!({"week_start": "not-a-date"}),
        serde_json::json!({"target_ton": -1.0}),
        serde_json::json!({"week_start": "-262143-01-01"}),
    ] {
        let app = create_app(create_test_state(Arc::new(StubBackend)));
        let resp = app
            .oneshot(post_json("/api/v1/simulations/mining", body.clone()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");
        let json = json_body(resp).await;
        assert_eq!(json["error"]["code"], "INVALID_INPUT");
    }
}

#[tokio::test]
async fn test_v1_shipping_week_start_at_calendar_edge_is_400() {
    let app = create_app(create_test_state(Arc::new(StubBackend)));
    let resp = app
        .oneshot(post_json(
            "/api/v1/simulations/shipping",
            serde_json::json!({"week_start": "-262143-01-01"}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp).await;
    assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_v1_shipping_empty_window_uses_scenario() {
    let app = create_app(create_test_state(Arc::new(StubBackend)));
    let resp = app
        .oneshot(post_json(
            "/api/v1/simulations/shipping",
            serde_json::json!({"week_start": "2030-01-07", "cargo_volume_ton": 3000.0}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_body(resp).await;
    assert_eq!(json["data"]["used_default_scenario"], true);
    assert_eq!(json["data"]["results"][0]["input_features"]["cargo_volume_ton"], 3000.0);
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let app = create_app(create_test_state(Arc::new(StubBackend)));
    let resp = app
        .oneshot(Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
