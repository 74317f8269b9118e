//! Rendering surface
//!
//! The chart library is an external collaborator: it takes a declarative
//! option object per mount point and draws it. `ChartSurface` is the seam;
//! `SnapshotSurface` records everything handed to it so the result can be
//! shipped to a browser, written to disk or inspected in tests.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Text shown on chart mounts while data is loading
pub const LOADING_TEXT: &str = "加载中...";
/// Text shown on chart mounts after a global load failure
pub const LOAD_FAILED_TEXT: &str = "加载失败";

/// Errors raised while handing work to the surface
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Mount point not found: {0}")]
    MountNotFound(String),

    #[error("Invalid shape resource: {0}")]
    InvalidShape(String),

    #[error("Invalid chart option: {0}")]
    InvalidOption(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What a mount point currently shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MountState {
    Empty,
    Loading { text: String },
    Chart { option: Value },
    Text { text: String },
    Failed { message: String },
}

/// The chart library, as seen by the panels
pub trait ChartSurface: Send + Sync {
    /// Whether a mount point with this id exists
    fn has_mount(&self, mount: &str) -> bool;

    /// Hand a chart option to the mount point
    fn set_option(&self, mount: &str, option: Value) -> Result<(), RenderError>;

    /// Replace the text content of an element
    fn set_text(&self, element: &str, text: &str) -> Result<(), RenderError>;

    /// Replace the mount's content with a loading marker
    fn show_loading(&self, mount: &str);

    /// Replace the mount's content with an inline error marker
    fn show_error(&self, mount: &str, message: &str);

    /// Register a geographic shape document under `name`
    fn register_map(&self, name: &str, geo_json: Value) -> Result<(), RenderError>;

    fn has_map(&self, name: &str) -> bool;

    /// Blocking, user-visible message
    fn alert(&self, message: &str);
}

/// Serializable record of a surface's state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub mounts: BTreeMap<String, MountState>,
    pub maps: BTreeSet<String>,
    pub alerts: Vec<String>,
}

impl DashboardSnapshot {
    pub fn mount(&self, id: &str) -> Option<&MountState> {
        self.mounts.get(id)
    }

    /// Option handed to a chart mount, if any
    pub fn option(&self, id: &str) -> Option<&Value> {
        match self.mounts.get(id) {
            Some(MountState::Chart { option }) => Some(option),
            _ => None,
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.mounts.get(id) {
            Some(MountState::Text { text }) => Some(text),
            _ => None,
        }
    }
}

/// In-memory surface over a fixed set of mount points
#[derive(Debug)]
pub struct SnapshotSurface {
    snapshot: Mutex<DashboardSnapshot>,
}

impl SnapshotSurface {
    /// Surface exposing exactly these mount/element ids
    pub fn new<I, S>(mounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mounts = mounts
            .into_iter()
            .map(|id| (id.into(), MountState::Empty))
            .collect();

        Self {
            snapshot: Mutex::new(DashboardSnapshot {
                mounts,
                ..Default::default()
            }),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.lock().clone()
    }

    pub fn into_snapshot(self) -> DashboardSnapshot {
        self.snapshot
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, DashboardSnapshot> {
        self.snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn replace(&self, mount: &str, state: MountState) -> Result<(), RenderError> {
        let mut snapshot = self.lock();
        match snapshot.mounts.get_mut(mount) {
            Some(slot) => {
                *slot = state;
                Ok(())
            }
            None => Err(RenderError::MountNotFound(mount.to_string())),
        }
    }
}

impl ChartSurface for SnapshotSurface {
    fn has_mount(&self, mount: &str) -> bool {
        self.lock().mounts.contains_key(mount)
    }

    fn set_option(&self, mount: &str, option: Value) -> Result<(), RenderError> {
        if !option.is_object() {
            return Err(RenderError::InvalidOption(format!(
                "option for '{}' is not an object",
                mount
            )));
        }
        self.replace(mount, MountState::Chart { option })
    }

    fn set_text(&self, element: &str, text: &str) -> Result<(), RenderError> {
        self.replace(
            element,
            MountState::Text {
                text: text.to_string(),
            },
        )
    }

    fn show_loading(&self, mount: &str) {
        let state = MountState::Loading {
            text: LOADING_TEXT.to_string(),
        };
        if self.replace(mount, state).is_err() {
            tracing::debug!(mount, "No mount point for loading marker");
        }
    }

    fn show_error(&self, mount: &str, message: &str) {
        let state = MountState::Failed {
            message: message.to_string(),
        };
        if self.replace(mount, state).is_err() {
            tracing::debug!(mount, "No mount point for error marker");
        }
    }

    fn register_map(&self, name: &str, geo_json: Value) -> Result<(), RenderError> {
        let is_geo = geo_json
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| t == "FeatureCollection" || t == "Feature")
            || geo_json.get("features").is_some_and(Value::is_array);

        if !is_geo {
            return Err(RenderError::InvalidShape(format!(
                "'{}' is not a GeoJSON feature collection",
                name
            )));
        }

        self.lock().maps.insert(name.to_string());
        Ok(())
    }

    fn has_map(&self, name: &str) -> bool {
        self.lock().maps.contains(name)
    }

    fn alert(&self, message: &str) {
        tracing::error!(alert = message, "Dashboard alert");
        self.lock().alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_option_on_known_mount() {
        let surface = SnapshotSurface::new(["trendChart"]);
        surface
            .set_option("trendChart", json!({"series": []}))
            .unwrap();

        let snapshot = surface.snapshot();
        assert_eq!(snapshot.option("trendChart"), Some(&json!({"series": []})));
    }

    #[test]
    fn test_unknown_mount() {
        let surface = SnapshotSurface::new(["trendChart"]);
        assert!(!surface.has_mount("mapChart"));
        assert!(matches!(
            surface.set_option("mapChart", json!({})),
            Err(RenderError::MountNotFound(_))
        ));
        surface.show_error("mapChart", "ignored");
        assert_eq!(surface.snapshot().mounts.len(), 1);
    }

    #[test]
    fn test_option_must_be_object() {
        let surface = SnapshotSurface::new(["trendChart"]);
        assert!(matches!(
            surface.set_option("trendChart", json!([1, 2])),
            Err(RenderError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_markers_and_alerts() {
        let surface = SnapshotSurface::new(["a", "b"]);
        surface.show_loading("a");
        surface.show_error("b", LOAD_FAILED_TEXT);
        surface.alert("boom");

        let snapshot = surface.into_snapshot();
        assert_eq!(
            snapshot.mount("a"),
            Some(&MountState::Loading {
                text: LOADING_TEXT.to_string()
            })
        );
        assert_eq!(
            snapshot.mount("b"),
            Some(&MountState::Failed {
                message: LOAD_FAILED_TEXT.to_string()
            })
        );
        assert_eq!(snapshot.alerts, vec!["boom".to_string()]);
    }

    #[test]
    fn test_register_map() {
        let surface = SnapshotSurface::new(["mapChart"]);
        assert!(!surface.has_map("HK"));

        surface
            .register_map("HK", json!({"type": "FeatureCollection", "features": []}))
            .unwrap();
        assert!(surface.has_map("HK"));

        assert!(matches!(
            surface.register_map("XX", json!({"hello": "world"})),
            Err(RenderError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_snapshot_serializes_tagged_states() {
        let surface = SnapshotSurface::new(["updateTime"]);
        surface.set_text("updateTime", "2025-03-23").unwrap();

        let json = serde_json::to_value(surface.snapshot()).unwrap();
        assert_eq!(json["mounts"]["updateTime"]["state"], "text");
        assert_eq!(json["mounts"]["updateTime"]["text"], "2025-03-23");
    }
}
