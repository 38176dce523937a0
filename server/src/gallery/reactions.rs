//! Photo Reactions API
//!
//! Per-session emoji reactions: at most one per (photo, viewer session),
//! toggled on/off or switched by repeated posts.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use gala_common::{BatchReactionsResponse, ReactionsResponse, ToggleRequest};

use crate::api::AppState;
use crate::db;

/// The fixed set of emoji guests can react with.
pub const ALLOWED_EMOJIS: &[&str] = &["❤️", "😍", "😂", "👏", "🔥"];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ReactionsError {
    #[error("Photo not found")]
    PhotoNotFound,
    #[error("session_id is required")]
    MissingSession,
    #[error("photo_id or photo_ids is required")]
    MissingPhotoId,
    #[error("Invalid photo id: {0}")]
    InvalidPhotoId(String),
    #[error("Emoji not allowed")]
    InvalidEmoji,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ReactionsError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::PhotoNotFound => (StatusCode::NOT_FOUND, "Photo not found".to_string()),
            Self::MissingSession | Self::MissingPhotoId | Self::InvalidPhotoId(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::InvalidEmoji => (StatusCode::BAD_REQUEST, "Emoji not allowed".to_string()),
            Self::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Query parameters for reaction counts.
///
/// Either `photo_id` (single) or `photo_ids` (comma-separated batch) must
/// be present, plus the viewer's `session_id`.
#[derive(Debug, Deserialize)]
pub struct ReactionsQuery {
    pub photo_id: Option<Uuid>,
    pub photo_ids: Option<String>,
    pub session_id: Option<String>,
}

/// Get reaction counts for one photo or a batch.
///
/// GET /api/reactions?photo_id=&session_id=
/// GET /api/reactions?photo_ids=a,b,c&session_id=
pub async fn get_reactions(
    State(state): State<AppState>,
    Query(query): Query<ReactionsQuery>,
) -> Result<Response, ReactionsError> {
    let session_id = query.session_id.ok_or(ReactionsError::MissingSession)?;

    if let Some(raw_ids) = query.photo_ids {
        let photo_ids = raw_ids
            .split(',')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.trim()
                    .parse::<Uuid>()
                    .map_err(|_| ReactionsError::InvalidPhotoId(part.to_string()))
            })
            .collect::<Result<Vec<Uuid>, _>>()?;

        let reactions = db::get_reaction_counts_batch(&state.db, &photo_ids, &session_id).await?;
        return Ok(Json(BatchReactionsResponse { reactions }).into_response());
    }

    if let Some(photo_id) = query.photo_id {
        let reactions = db::get_reaction_counts(&state.db, photo_id, &session_id).await?;
        return Ok(Json(ReactionsResponse { reactions }).into_response());
    }

    Err(ReactionsError::MissingPhotoId)
}

/// Toggle a reaction and return the refreshed counts.
///
/// POST /api/reactions
///
/// Same emoji removes, different emoji switches, none inserts.
#[tracing::instrument(skip(state, req))]
pub async fn toggle(
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ReactionsResponse>, ReactionsError> {
    if req.session_id.trim().is_empty() {
        return Err(ReactionsError::MissingSession);
    }
    if !ALLOWED_EMOJIS.contains(&req.emoji.as_str()) {
        return Err(ReactionsError::InvalidEmoji);
    }

    // Check the photo exists so a bad id is a 404, not an FK error.
    db::find_photo_by_id(&state.db, req.photo_id)
        .await?
        .ok_or(ReactionsError::PhotoNotFound)?;

    let reactions =
        db::toggle_reaction(&state.db, req.photo_id, &req.emoji, &req.session_id).await?;

    Ok(Json(ReactionsResponse { reactions }))
}
