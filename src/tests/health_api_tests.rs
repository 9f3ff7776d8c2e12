#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::routes;
    use crate::state::AppState;

    fn setup_test_app(root: &std::path::Path) -> Router {
        let mut config = AppConfig::default();
        config.media.root = root.to_string_lossy().to_string();
        routes::router(AppState::new(config))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let media = TempDir::new().unwrap();
        let (status, body) = get_body(setup_test_app(media.path()), "/healthz").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_readyz_endpoint_ok() {
        let media = TempDir::new().unwrap();
        let (status, body) = get_body(setup_test_app(media.path()), "/readyz").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ready");
    }

    #[tokio::test]
    async fn test_readyz_missing_root() {
        let media = TempDir::new().unwrap();
        let app = setup_test_app(&media.path().join("gone"));
        let (status, body) = get_body(app, "/readyz").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("not ready"));
    }

    #[tokio::test]
    async fn test_readyz_root_is_file() {
        let media = TempDir::new().unwrap();
        let file = media.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        let (status, body) = get_body(setup_test_app(&file), "/readyz").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "not ready: media root is not a directory");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let media = TempDir::new().unwrap();
        let (status, body) = get_body(setup_test_app(media.path()), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["walks_started"], 0);
        assert_eq!(v["files_counted"], 0);
        assert!(v.get("uptime_seconds").is_some());
    }

    #[tokio::test]
    async fn test_metrics_prometheus_endpoint() {
        let media = TempDir::new().unwrap();
        let (status, body) = get_body(setup_test_app(media.path()), "/metrics/prometheus").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("mediatree_walks_started 0"));
        assert!(body.contains("mediatree_skipped_dirs 0"));
        assert!(body.contains("# TYPE mediatree_uptime_seconds gauge"));
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let media = TempDir::new().unwrap();
        let (status, body) = get_body(setup_test_app(media.path()), "/version").await;

        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["name"], "mediatree");
        assert!(!v["version"].as_str().unwrap().is_empty());
        assert!(v.get("build").is_some());
    }
}
