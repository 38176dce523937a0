//! Download Relay
//!
//! Fetches a stored object server-side and relays it to the browser with
//! an attachment disposition, working around cross-origin restrictions on
//! direct storage fetches. Only URLs inside the gallery's own storage are
//! fetched.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use crate::api::AppState;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Storage is not configured.
    #[error("File downloads are not configured")]
    NotConfigured,

    /// Missing url parameter.
    #[error("url parameter is required")]
    MissingUrl,

    /// URL points outside the gallery's storage.
    #[error("URL not allowed")]
    Forbidden,

    /// Upstream storage fetch failed.
    #[error("Failed to fetch file from storage")]
    UpstreamFailed,
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::MissingUrl => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UpstreamFailed => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Query parameters for the download relay.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Public storage URL of the object.
    pub url: Option<String>,
    /// Filename for the attachment disposition.
    pub filename: Option<String>,
}

/// Fetch a stored object and relay it as an attachment.
///
/// GET /api/download?url=&filename=
#[tracing::instrument(skip(state))]
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, DownloadError> {
    let s3 = state.s3.as_ref().ok_or(DownloadError::NotConfigured)?;

    let url = query.url.ok_or(DownloadError::MissingUrl)?;
    let filename = query.filename.unwrap_or_else(|| "foto".to_string());

    if !s3.is_gallery_url(&url) {
        tracing::warn!(url = %url, "Refused download relay for foreign URL");
        return Err(DownloadError::Forbidden);
    }

    let response = state.http.get(&url).send().await.map_err(|err| {
        tracing::error!(url = %url, "Storage fetch failed: {err}");
        DownloadError::UpstreamFailed
    })?;

    if !response.status().is_success() {
        tracing::error!(url = %url, status = %response.status(), "Storage fetch returned error");
        return Err(DownloadError::UpstreamFailed);
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = response
        .bytes()
        .await
        .map_err(|_| DownloadError::UpstreamFailed)?;

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];

    Ok((headers, axum::body::Body::from(bytes)).into_response())
}
