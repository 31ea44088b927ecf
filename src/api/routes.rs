//! API route definitions
//!
//! - `/` and `/health`: banner and health
//! - `/chat`, `/simulate`: chat entry points
//! - `/api/v1/simulations/{mining,shipping}`, `/api/v1/dataset`: structured API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, ApiState};

/// Versioned structured API, nested under `/api/v1`.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/simulations/mining", post(handlers::simulate_mining))
        .route("/simulations/shipping", post(handlers::simulate_shipping))
        .route("/dataset", get(handlers::dataset_summary))
        .with_state(state)
}

/// Chat and health endpoints at the root.
pub fn chat_routes(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/simulate", post(handlers::simulate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ChatRouter;
    use crate::dataset::HistoricalDataset;
    use crate::llm::OfflineBackend;
    use crate::simulation::Simulator;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_state() -> ApiState {
        ApiState::new(ChatRouter::new(
            Arc::new(Simulator::with_defaults(HistoricalDataset::empty())),
            Arc::new(OfflineBackend),
            10_000.0,
            Arc::new(|| NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()),
        ))
    }

    #[tokio::test]
    async fn test_api_routes_dataset() {
        let response = api_routes(create_test_state())
            .oneshot(Request::builder().uri("/dataset").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_routes_health() {
        let response = chat_routes(create_test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
