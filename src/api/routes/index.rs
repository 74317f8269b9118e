//! Index Route
//!
//! - GET / - Dashboard page
//!
//! The page registers the shape resource with ECharts, fetches `/api/panels`
//! and applies each mount's state to the matching element.

use axum::{http::Uri, response::Html};

use crate::api::error::ApiError;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
