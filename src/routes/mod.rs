//! HTTP route handlers.
//!
//! - `home`: the media tree endpoint (`/`, `/index`, `/home`)
//! - `health`: liveness, readiness, metrics and version endpoints

pub mod health;
pub mod home;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{middleware, state::AppState};

/// Builds the application router with its request-level layers.
pub fn router(state: AppState) -> Router {
    let cfg_arc = state.config.clone();

    Router::new()
        .route("/", get(home::index))
        .route("/index", get(home::index))
        .route("/home", get(home::index))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg_arc, middleware::security_headers::security_headers_middleware))
}
