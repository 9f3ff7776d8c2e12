use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight, never touches the filesystem
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: the media root must be a reachable directory
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    // Network mounts can hang on stat, so bound the check
    let probe = tokio::fs::metadata(state.config.media.root.clone());
    match tokio::time::timeout(std::time::Duration::from_secs(5), probe).await {
        Ok(Ok(md)) if md.is_dir() => (StatusCode::OK, "ready").into_response(),
        Ok(Ok(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "not ready: media root is not a directory").into_response()
        }
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP mediatree_walks_started Total tree walks started\n# TYPE mediatree_walks_started counter\nmediatree_walks_started {}\n\
# HELP mediatree_walks_completed Total tree walks completed\n# TYPE mediatree_walks_completed counter\nmediatree_walks_completed {}\n\
# HELP mediatree_walks_failed Total tree walks failed\n# TYPE mediatree_walks_failed counter\nmediatree_walks_failed {}\n\
# HELP mediatree_empty_roots Walks that found no media\n# TYPE mediatree_empty_roots counter\nmediatree_empty_roots {}\n\
# HELP mediatree_files_counted Files counted\n# TYPE mediatree_files_counted counter\nmediatree_files_counted {}\n\
# HELP mediatree_dirs_counted Directories counted\n# TYPE mediatree_dirs_counted counter\nmediatree_dirs_counted {}\n\
# HELP mediatree_skipped_dirs Directories skipped during walks\n# TYPE mediatree_skipped_dirs counter\nmediatree_skipped_dirs {}\n\
# HELP mediatree_uptime_seconds Uptime seconds\n# TYPE mediatree_uptime_seconds gauge\nmediatree_uptime_seconds {}\n",
        m.walks_started,
        m.walks_completed,
        m.walks_failed,
        m.empty_roots,
        m.files_counted,
        m.dirs_counted,
        m.skipped_dirs,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
