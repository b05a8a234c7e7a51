use std::sync::Arc;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::upstream::AnalysisService;

/// Per-route upstream deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayTimeouts {
    pub analyze: Duration,
    pub search: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            analyze: Duration::from_secs(30),
            search: Duration::from_secs(25),
        }
    }
}

impl From<&UpstreamConfig> for GatewayTimeouts {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            analyze: Duration::from_secs(config.analyze_timeout_seconds),
            search: Duration::from_secs(config.search_timeout_seconds),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    /// `None` when no endpoint is configured; proxy routes answer 503.
    pub upstream: Option<Arc<dyn AnalysisService>>,
    pub timeouts: GatewayTimeouts,
}

impl AppState {
    pub fn new(upstream: Arc<dyn AnalysisService>, timeouts: GatewayTimeouts) -> Self {
        Self {
            upstream: Some(upstream),
            timeouts,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            upstream: None,
            timeouts: GatewayTimeouts::default(),
        }
    }
}
