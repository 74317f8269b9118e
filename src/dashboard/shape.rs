//! Geographic shape loader
//!
//! Fetches the district GeoJSON once and registers it with the surface. A
//! failure here is only logged: the map panel reports itself ineffective and
//! every other panel is unaffected.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use super::loader::{build_client, LoadError};
use crate::charts::ChartSurface;
use crate::config::DashboardConfig;

/// Something that can produce the shape resource
#[async_trait]
pub trait ShapeSource: Send + Sync {
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Value, LoadError>;
}

/// `GET /static/js/hongkong.json` over HTTP
#[derive(Debug, Clone)]
pub struct HttpShapeSource {
    client: Client,
    url: String,
}

impl HttpShapeSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, LoadError> {
        Self::new(config.shape_url(), Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl ShapeSource for HttpShapeSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Value, LoadError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(LoadError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(LoadError::from_reqwest)?;
        serde_json::from_slice(&body).map_err(|e| LoadError::Decode(e.to_string()))
    }
}

/// Shape resource read from disk
#[derive(Debug, Clone)]
pub struct FileShapeSource {
    path: PathBuf,
}

impl FileShapeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ShapeSource for FileShapeSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Value, LoadError> {
        let content = tokio::fs::read(&self.path).await?;
        serde_json::from_slice(&content).map_err(|e| LoadError::Decode(e.to_string()))
    }
}

/// Fetch the shape and register it under `name`. Returns whether the map is
/// now available.
pub async fn register_shape(
    source: &dyn ShapeSource,
    surface: &dyn ChartSurface,
    name: &str,
) -> bool {
    let shape = match source.fetch().await {
        Ok(shape) => shape,
        Err(e) => {
            tracing::error!(source = %source.describe(), error = %e, "Failed to load map shape");
            return false;
        }
    };

    match surface.register_map(name, shape) {
        Ok(()) => {
            tracing::info!(map = name, source = %source.describe(), "Map shape registered");
            true
        }
        Err(e) => {
            tracing::error!(map = name, error = %e, "Failed to register map shape");
            false
        }
    }
}
