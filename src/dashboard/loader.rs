//! Data loader
//!
//! One request per dashboard run, no retries. The body is normalized through
//! [`crate::schema`] before anything downstream sees it, and an application
//! error carried in the body short-circuits the run. A malformed slice only
//! empties that slice; see [`RawPayload::normalize`].

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::DashboardConfig;
use crate::model::DashboardPayload;
use crate::schema::RawPayload;
use crate::source::CaseDataSource;

/// Errors raised while loading the payload or the shape resource
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The backend answered with an `error` field
    #[error("{0}")]
    Application(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker failed: {0}")]
    Worker(String),
}

impl LoadError {
    /// Text for the user-facing alert
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Application(message) => format!("API返回错误: {}", message),
            other => format!("获取数据失败: {}", other),
        }
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LoadError::Timeout
        } else {
            LoadError::Transport(e)
        }
    }
}

/// Something that can produce a dashboard payload
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Where the payload comes from, for logs
    fn describe(&self) -> String;

    /// Fetch and normalize the payload. An embedded `error` is returned as
    /// part of the payload, not as `Err`.
    async fn fetch(&self) -> Result<DashboardPayload, LoadError>;
}

/// Fetch a payload and accept it only if it carries no application error
pub async fn load_payload(source: &dyn PayloadSource) -> Result<DashboardPayload, LoadError> {
    tracing::debug!(source = %source.describe(), "Loading dashboard payload");

    let payload = source.fetch().await?;
    if let Some(error) = payload.error {
        tracing::warn!(source = %source.describe(), error = %error, "Backend reported an error");
        return Err(LoadError::Application(error));
    }

    tracing::info!(
        days = payload.time_trend.len(),
        districts = payload.district_data.len(),
        hotspots = payload.hotspot_districts.len(),
        "Dashboard payload loaded"
    );
    Ok(payload)
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, LoadError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LoadError::Client(e.to_string()))
}

/// `GET /api/data` over HTTP
#[derive(Debug, Clone)]
pub struct HttpPayloadSource {
    client: Client,
    url: String,
}

impl HttpPayloadSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, LoadError> {
        Self::new(config.data_url(), Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PayloadSource for HttpPayloadSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<DashboardPayload, LoadError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(LoadError::from_reqwest)?;

        let status = response.status();
        let body = response.bytes().await.map_err(LoadError::from_reqwest)?;

        // Error bodies from the backend still carry a JSON `error` field
        let raw: RawPayload = match serde_json::from_slice(&body) {
            Ok(raw) => raw,
            Err(_) if !status.is_success() => return Err(LoadError::Status(status.as_u16())),
            Err(e) => return Err(LoadError::Decode(e.to_string())),
        };

        if !status.is_success() && raw.error.is_none() {
            return Err(LoadError::Status(status.as_u16()));
        }

        Ok(raw.normalize())
    }
}

/// In-process source reading the case-data file directly
#[derive(Debug, Clone)]
pub struct LocalPayloadSource {
    source: Arc<CaseDataSource>,
}

impl LocalPayloadSource {
    pub fn new(source: Arc<CaseDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PayloadSource for LocalPayloadSource {
    fn describe(&self) -> String {
        self.source.path().display().to_string()
    }

    async fn fetch(&self) -> Result<DashboardPayload, LoadError> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || source.build_payload())
            .await
            .map_err(|e| LoadError::Worker(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn source(base: &str) -> HttpPayloadSource {
        HttpPayloadSource::new(format!("{}/api/data", base), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_http_payload_with_legacy_keys() {
        let router = Router::new().route(
            "/api/data",
            get(|| async {
                Json(json!({
                    "summary": {
                        "totalConfirmed": 120,
                        "newCasesToday": 4,
                        "deathCases": 2,
                        "curedCases": 96,
                        "latestDate": "2025-03-02"
                    },
                    "timeTrend": [
                        {"日期": "2025-03-01", "新增病例": 5.0, "确诊数": 116.0, "增长率": 0.0},
                        {"date": "2025-03-02", "newCases": 4, "cumulativeConfirmed": 120}
                    ],
                    "districtData": [{"地区": "北区", "确诊数": 120, "新增病例": 4}],
                    "hotspotDistricts": []
                }))
            }),
        );
        let base = spawn_server(router).await;

        let payload = load_payload(&source(&base)).await.unwrap();
        assert_eq!(payload.time_trend.len(), 2);
        assert_eq!(payload.time_trend[0].new_cases, 5);
        assert_eq!(payload.district_data[0].district_name, "北区");
        assert_eq!(payload.summary.unwrap().total_confirmed, 120);
    }

    #[tokio::test]
    async fn test_application_error_short_circuits() {
        let router = Router::new().route("/api/data", get(|| async { Json(json!({"error": "x"})) }));
        let base = spawn_server(router).await;

        let err = load_payload(&source(&base)).await.unwrap_err();
        assert!(matches!(err, LoadError::Application(ref m) if m == "x"));
        assert_eq!(err.user_message(), "API返回错误: x");
    }

    #[tokio::test]
    async fn test_error_status_without_body() {
        let router = Router::new().route(
            "/api/data",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = spawn_server(router).await;

        let err = load_payload(&source(&base)).await.unwrap_err();
        assert!(matches!(err, LoadError::Status(502)));
        assert!(err.user_message().starts_with("获取数据失败"));
    }

    #[tokio::test]
    async fn test_schema_violation_empties_one_slice() {
        let router = Router::new().route(
            "/api/data",
            get(|| async {
                Json(json!({
                    "timeTrend": [{"date": "2025-03-02", "newCases": 4}],
                    "districtData": [{"confirmedCount": 3}]
                }))
            }),
        );
        let base = spawn_server(router).await;

        let payload = load_payload(&source(&base)).await.unwrap();
        assert!(payload.district_data.is_empty());
        assert_eq!(payload.time_trend.len(), 1);
    }

    #[tokio::test]
    async fn test_timeout() {
        let router = Router::new().route(
            "/api/data",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(Value::Null)
            }),
        );
        let base = spawn_server(router).await;
        let source =
            HttpPayloadSource::new(format!("{}/api/data", base), Duration::from_millis(100)).unwrap();

        let err = load_payload(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Timeout));
    }

    #[tokio::test]
    async fn test_local_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalPayloadSource::new(Arc::new(CaseDataSource::new(
            dir.path().join("missing.csv"),
        )));

        let err = load_payload(&source).await.unwrap_err();
        match err {
            LoadError::Application(message) => assert!(message.starts_with("文件不存在")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
