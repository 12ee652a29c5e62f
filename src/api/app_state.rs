use crate::observability::AppMetrics;
use crate::services::trace::TraceIdGenerator;
use crate::services::upstream::UpstreamClient;
use std::sync::Arc;

/// Application state containing the shared gateway collaborators
#[derive(Clone)]
pub struct AppState {
    /// Upstream retrieval service client
    pub upstream: Arc<dyn UpstreamClient>,
    /// Trace identifier generator for requests without X-Trace-Id
    pub trace: Arc<dyn TraceIdGenerator>,
    /// Shared application metrics
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("upstream", &"Arc<dyn UpstreamClient>")
            .field("trace", &"Arc<dyn TraceIdGenerator>")
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        upstream: Box<dyn UpstreamClient>,
        trace: Box<dyn TraceIdGenerator>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            upstream: Arc::from(upstream),
            trace: Arc::from(trace),
            metrics,
        }
    }
}
