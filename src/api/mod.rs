//! REST API endpoints.
//!
//! Axum-based proxy in front of the analysis service. Every failure is
//! turned into a `{"error": "..."}` body with a status code here; nothing
//! internal reaches the client.

pub mod gateway;
pub mod routes;
pub mod state;

use std::any::Any;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use gateway::ProxyRoute;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    GatewayTimeout(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// Upstream failure relayed with the upstream's own status code.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Detail is logged, never sent.
    #[error("Internal error: {detail}")]
    Internal { route: ProxyRoute, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal { route, .. } => route.internal_message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { route, detail } = &self {
            error!("{} unexpected error: {}", route, detail);
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (self.status(), Json(body)).into_response()
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    }
}

fn analyze_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Internal {
        route: ProxyRoute::Analyze,
        detail: panic_detail(panic.as_ref()),
    }
    .into_response()
}

fn search_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Internal {
        route: ProxyRoute::SearchPlayer,
        detail: panic_detail(panic.as_ref()),
    }
    .into_response()
}

/// Wrap a proxy route so a panicking handler still answers with the
/// route's generic 500 body.
pub fn guarded(route: ProxyRoute, handler: MethodRouter<AppState>) -> MethodRouter<AppState> {
    match route {
        ProxyRoute::Analyze => handler.layer(CatchPanicLayer::custom(analyze_panic)),
        ProxyRoute::SearchPlayer => handler.layer(CatchPanicLayer::custom(search_panic)),
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/analyze",
            guarded(ProxyRoute::Analyze, post(routes::analyze::analyze)),
        )
        .route(
            "/api/search-player",
            guarded(
                ProxyRoute::SearchPlayer,
                post(routes::search_player::search_player),
            ),
        )
        .route("/api/health", get(routes::health::health))
        .with_state(state)
}

/// Add CORS and, optionally, request tracing.
pub fn with_http_layers(router: Router, cors_origin: &str, access_log: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let cors = if cors_origin == "*" {
        cors.allow_origin(AnyOrigin)
    } else {
        match HeaderValue::from_str(cors_origin) {
            Ok(origin) => cors.allow_origin(origin),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}, allowing any", cors_origin);
                cors.allow_origin(AnyOrigin)
            }
        }
    };

    let router = router.layer(cors);
    if access_log {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    async fn read_error(resp: Response) -> (StatusCode, String) {
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, parsed.error)
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::RateLimited("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (ApiError::BadGateway("x".into()), StatusCode::BAD_GATEWAY),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ApiError::GatewayTimeout("x".into()), StatusCode::GATEWAY_TIMEOUT),
            (ApiError::PayloadTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE),
        ];

        for (err, expected) in cases {
            let (status, message) = read_error(err.into_response()).await;
            assert_eq!(status, expected);
            assert_eq!(message, "x");
        }
    }

    #[tokio::test]
    async fn test_upstream_error_keeps_status() {
        let err = ApiError::Upstream {
            status: 418,
            message: "Summoner is a teapot".to_string(),
        };
        let (status, message) = read_error(err.into_response()).await;
        assert_eq!(status.as_u16(), 418);
        assert_eq!(message, "Summoner is a teapot");
    }

    #[tokio::test]
    async fn test_upstream_error_invalid_status_falls_back() {
        let err = ApiError::Upstream {
            status: 1000,
            message: "odd".to_string(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = ApiError::Internal {
            route: ProxyRoute::Analyze,
            detail: "secret stack trace".to_string(),
        };
        let (status, message) = read_error(err.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
        assert_eq!(message, ProxyRoute::Analyze.internal_message());
    }

    #[tokio::test]
    async fn test_panicking_handler_becomes_generic_500() {
        let app = Router::new()
            .route(
                "/boom",
                guarded(
                    ProxyRoute::SearchPlayer,
                    post(|| async {
                        if true {
                            panic!("database password is hunter2");
                        }
                        "unreachable"
                    }),
                ),
            )
            .with_state(AppState::unconfigured());

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/boom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, message) = read_error(resp).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("hunter2"));
        assert_eq!(message, ProxyRoute::SearchPlayer.internal_message());
    }

    #[tokio::test]
    async fn test_cors_layer_answers_preflight() {
        let app = with_http_layers(
            build_router(AppState::unconfigured()),
            "https://riftrewind.example.com",
            false,
        );

        let resp = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/analyze")
                    .header("origin", "https://riftrewind.example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("https://riftrewind.example.com")
        );
    }
}
