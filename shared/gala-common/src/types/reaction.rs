//! Reaction Wire Types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-emoji reaction count for one photo.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReactionCount {
    /// The emoji.
    pub emoji: String,
    /// How many sessions reacted with it.
    pub count: i64,
    /// Whether the requesting session contributed to this count.
    pub reacted: bool,
}

/// Body of `POST /api/reactions` — one toggle call.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ToggleRequest {
    /// Target photo.
    pub photo_id: Uuid,
    /// Chosen emoji (must be in the fixed allowed set).
    pub emoji: String,
    /// Viewer session token. Correlation only, never an identity.
    pub session_id: String,
}

/// Reaction counts for a single photo.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReactionsResponse {
    /// Counts ordered most-used first.
    pub reactions: Vec<ReactionCount>,
}

/// Reaction counts for a batch of photos, keyed by photo id.
///
/// Only photos with at least one reaction appear.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BatchReactionsResponse {
    /// Per-photo counts.
    pub reactions: HashMap<Uuid, Vec<ReactionCount>>,
}
