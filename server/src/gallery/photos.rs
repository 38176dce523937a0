//! Gallery Photo Endpoints
//!
//! Listing (flat and timeline-grouped) and administrator-authorized
//! deletion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use gala_common::PhotoResponse;

use super::timeline::{group_by_timeline, TimelineEvent};
use crate::api::AppState;
use crate::db;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum PhotosError {
    /// Photo not found.
    #[error("Photo not found")]
    NotFound,

    /// Wrong administrator password.
    #[error("Incorrect password")]
    Unauthorized,

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for PhotosError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Photo not found"),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Incorrect password"),
            Self::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for the flat photo listing.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PhotosResponse {
    /// Every record, newest first.
    pub photos: Vec<PhotoResponse>,
}

/// One timeline bucket with its media.
#[derive(Debug, Serialize)]
pub struct TimelineGroup {
    /// The event window (or the trailing unclassified bucket).
    pub event: &'static TimelineEvent,
    /// Media captured inside the window, gallery order preserved.
    pub photos: Vec<PhotoResponse>,
}

/// Response for the timeline-grouped listing.
#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    /// Non-empty buckets in timeline order, unclassified last.
    pub groups: Vec<TimelineGroup>,
}

/// Body of the delete request: deletion is gated on a shared
/// administrator password, not on user identity.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub password: String,
}

/// Response for a successful deletion.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// List every photo/video record, newest first.
///
/// GET /api/photos
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "photos",
    responses(
        (status = 200, body = PhotosResponse),
    ),
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<PhotosResponse>, PhotosError> {
    let photos = db::list_photos(&state.db).await?;
    Ok(Json(PhotosResponse {
        photos: photos.into_iter().map(Into::into).collect(),
    }))
}

/// List the gallery grouped by wedding timeline windows.
///
/// GET /api/photos/timeline
pub async fn timeline(
    State(state): State<AppState>,
) -> Result<Json<TimelineResponse>, PhotosError> {
    let photos = db::list_photos(&state.db).await?;

    let groups = group_by_timeline(photos, |photo| photo.date_taken)
        .into_iter()
        .map(|(event, photos)| TimelineGroup {
            event,
            photos: photos.into_iter().map(Into::into).collect(),
        })
        .collect();

    Ok(Json(TimelineResponse { groups }))
}

/// Delete a record and its stored object.
///
/// DELETE /api/photos/{id}
///
/// The record goes first; storage cleanup is best-effort and never fails
/// the call.
#[tracing::instrument(skip(state, req))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, PhotosError> {
    if req.password != state.config.delete_password {
        return Err(PhotosError::Unauthorized);
    }

    let deleted = db::delete_photo(&state.db, id)
        .await?
        .ok_or(PhotosError::NotFound)?;

    // Reactions are gone via cascade; now try to remove the stored object.
    if let (Some(s3), Some(key)) = (state.s3.as_ref(), deleted.s3_key.as_deref()) {
        if let Err(err) = s3.delete(key).await {
            tracing::error!(photo_id = %id, key = %key, "Failed to delete stored object: {err}");
        }
    }

    tracing::info!(photo_id = %id, file_name = %deleted.file_name, "Photo deleted");

    Ok(Json(DeleteResponse { success: true }))
}
