use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;

/// The shared application state.
///
/// Cloned into every handler by Axum. Nothing in here is mutated per request
/// except the atomic metric counters; each walk builds its own result.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    ///
    /// The media root is read from here on every request and handed to the
    /// tree builder as a plain argument.
    pub config: Arc<AppConfig>,
    /// The application metrics.
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config: Arc::new(config), metrics: Metrics::new() }
    }
}
