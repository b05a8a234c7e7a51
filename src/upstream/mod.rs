//! Outbound calls to the analysis service.
//!
//! The gateway talks to the service through the `AnalysisService` trait so
//! tests can substitute it. Every call runs under `with_deadline`, which
//! drops the in-flight request (and its timer) on expiry.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::PlayerQuery;

/// Errors that can occur while calling the analysis service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream unreachable: {0}")]
    Unreachable(String),
}

/// Raw reply from the analysis service. The body is not parsed here.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Trait for the service that produces player analyses.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Service name for logging.
    fn name(&self) -> &'static str;

    /// Look up a player. Implementations make exactly one request.
    async fn analyze(&self, query: &PlayerQuery) -> Result<UpstreamReply, UpstreamError>;
}

/// Run `call` under a deadline.
///
/// On expiry the future is dropped, cancelling the request; the timer is
/// owned by this call and released on every exit path.
pub async fn with_deadline<F, T>(deadline: Duration, call: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(deadline)),
    }
}

/// Configuration for the HTTP analysis client.
#[derive(Debug, Clone)]
pub struct HttpAnalysisConfig {
    /// Endpoint that accepts `POST {summonerName, tag}`
    pub endpoint: Url,

    /// Connect timeout; the overall deadline is applied per route
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl HttpAnalysisConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("rift-rewind/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Analysis service reached over HTTP (the Lambda endpoint).
pub struct HttpAnalysisService {
    client: Client,
    endpoint: Url,
}

impl HttpAnalysisService {
    /// Create a new client with the given configuration.
    pub fn new(config: HttpAnalysisConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("rift-rewind")),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    fn name(&self) -> &'static str {
        "lambda"
    }

    async fn analyze(&self, query: &PlayerQuery) -> Result<UpstreamReply, UpstreamError> {
        debug!("POST {} for {}", self.endpoint, query);

        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

        Ok(UpstreamReply {
            status,
            body: body.to_vec(),
        })
    }
}

/// Scripted service for tests: replies with a fixed status and body, or
/// never replies at all.
#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    enum Script {
        Reply(StatusCode, Vec<u8>),
        Unreachable,
        Hang,
    }

    pub struct MockAnalysisService {
        script: Script,
        calls: AtomicUsize,
        last_query: Mutex<Option<PlayerQuery>>,
        cancelled: Arc<AtomicBool>,
    }

    /// Flags cancellation when an in-flight call is dropped.
    struct CancelGuard(Arc<AtomicBool>);

    impl Drop for CancelGuard {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    impl MockAnalysisService {
        fn with_script(script: Script) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
                cancelled: Arc::new(AtomicBool::new(false)),
            }
        }

        pub fn reply(status: u16, body: impl Into<Vec<u8>>) -> Self {
            let status = StatusCode::from_u16(status).unwrap();
            Self::with_script(Script::Reply(status, body.into()))
        }

        pub fn json(status: u16, body: serde_json::Value) -> Self {
            Self::reply(status, body.to_string())
        }

        pub fn unreachable() -> Self {
            Self::with_script(Script::Unreachable)
        }

        pub fn hang() -> Self {
            Self::with_script(Script::Hang)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_query(&self) -> Option<PlayerQuery> {
            self.last_query.lock().ok().and_then(|q| q.clone())
        }

        /// True once a hanging call has been dropped by its caller.
        pub fn was_cancelled(&self) -> bool {
            self.cancelled.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisService for MockAnalysisService {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn analyze(&self, query: &PlayerQuery) -> Result<UpstreamReply, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last_query.lock() {
                *last = Some(query.clone());
            }

            match &self.script {
                Script::Reply(status, body) => Ok(UpstreamReply {
                    status: *status,
                    body: body.clone(),
                }),
                Script::Unreachable => Err(UpstreamError::Unreachable(
                    "connection refused".to_string(),
                )),
                Script::Hang => {
                    let _guard = CancelGuard(self.cancelled.clone());
                    std::future::pending::<()>().await;
                    unreachable!("pending future never resolves")
                }
            }
        }
    }
}
