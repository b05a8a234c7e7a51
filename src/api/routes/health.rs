use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub upstream_configured: bool,
    pub version: String,
}

/// Liveness check. Never calls upstream.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        upstream_configured: state.upstream.is_some(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::{AppState, GatewayTimeouts};
    use crate::upstream::mock::MockAnalysisService;

    async fn get_health(state: AppState) -> (StatusCode, serde_json::Value) {
        let resp = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_unconfigured() {
        let (status, json) = get_health(AppState::unconfigured()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["upstream_configured"], false);
    }

    #[tokio::test]
    async fn test_health_configured_does_not_call_upstream() {
        let mock = Arc::new(MockAnalysisService::reply(200, "{}"));
        let state = AppState::new(mock.clone(), GatewayTimeouts::default());

        let (_, json) = get_health(state).await;
        assert_eq!(json["upstream_configured"], true);
        assert_eq!(mock.calls(), 0);
    }
}
