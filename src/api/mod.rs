//! Epidash REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /` - Dashboard page
//! - `GET /api/data` - Aggregated case data
//! - `GET /api/panels` - Server-side panel snapshot
//! - `GET /static/*` - Static files, including `js/hongkong.json`
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use epidash::api::{serve, AppState};
//! use epidash::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api_config = config.api.clone();
//!
//!     serve(AppState::new(config), &api_config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/data", get(routes::data::get_data))
        .route("/panels", get(routes::data::get_panels));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let static_dir = state.config.source.static_dir.clone();
    let timeout = Duration::from_secs(state.config.api.request_timeout_secs);
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::index::index))
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(routes::index::not_found)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    tracing::info!(
        data_file = ?state.config.source.data_file,
        static_dir = ?state.config.source.static_dir,
        "Serving case data"
    );

    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Epidash listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Epidash shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    const CASES: &str = "报告日期,地区名称,新增确诊,累计确诊\n\
                         2025-03-01,北区,5,100\n\
                         2025-03-01,南区,1,20\n\
                         2025-03-02,北区,10,110\n\
                         2025-03-02,南区,2,22\n";

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.source.data_file = dir.join("cases.csv");
        config.source.static_dir = dir.join("static");
        config
    }

    fn create_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());

        std::fs::write(&config.source.data_file, CASES).unwrap();
        std::fs::create_dir_all(config.source.static_dir.join("js")).unwrap();
        std::fs::write(
            config.source.shape_file(),
            r#"{"type": "FeatureCollection", "features": []}"#,
        )
        .unwrap();

        (build_router(AppState::new(config)), dir)
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _dir) = create_test_app();
        assert_eq!(get(app, "/health/live").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _dir) = create_test_app();
        assert_eq!(get(app, "/health/ready").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_without_data() {
        let dir = tempdir().unwrap();
        let app = build_router(AppState::new(test_config(dir.path())));

        assert_eq!(
            get(app, "/health/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _dir) = create_test_app();
        let response = get(app, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["data_file"], "ok");
    }

    #[tokio::test]
    async fn test_get_data() {
        let (app, _dir) = create_test_app();
        let response = get(app, "/api/data").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body.get("error").map_or(true, Value::is_null));
        assert_eq!(body["summary"]["totalConfirmed"], 132);
        assert_eq!(body["summary"]["latestDate"], "2025-03-02");
        assert_eq!(body["timeTrend"].as_array().unwrap().len(), 2);
        assert_eq!(body["hotspotDistricts"][0]["districtName"], "北区");
    }

    #[tokio::test]
    async fn test_get_data_missing_file() {
        let dir = tempdir().unwrap();
        let app = build_router(AppState::new(test_config(dir.path())));
        let response = get(app, "/api/data").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("文件不存在"));
    }

    #[tokio::test]
    async fn test_get_panels() {
        let (app, _dir) = create_test_app();
        let response = get(app, "/api/panels").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["report"]["panels"].as_array().unwrap().len(), 6);
        assert_eq!(body["snapshot"]["mounts"]["trendChart"]["state"], "chart");
        assert_eq!(body["snapshot"]["mounts"]["totalConfirmed"]["text"], "132");
    }

    #[tokio::test]
    async fn test_static_shape() {
        let (app, _dir) = create_test_app();
        assert_eq!(
            get(app, "/static/js/hongkong.json").await.status(),
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_index_page() {
        let (app, _dir) = create_test_app();
        let response = get(app, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(r#"id="mapChart""#));

        // The page marks every chart loading, then failed when the fetch fails
        let chart_ids = html
            .lines()
            .find(|line| line.contains("const CHART_IDS"))
            .unwrap();
        let panels = crate::dashboard::PanelSet::standard(&Default::default());
        for mount in panels.chart_mounts() {
            assert!(chart_ids.contains(&format!("'{}'", mount)), "{mount} not marked");
        }
        assert!(html.contains(crate::charts::LOADING_TEXT));
        assert!(html.contains(crate::charts::LOAD_FAILED_TEXT));
        assert!(html.contains("AbortController"));
        assert!(html.contains("response.ok"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (app, _dir) = create_test_app();
        let response = get(app, "/api/nope").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
