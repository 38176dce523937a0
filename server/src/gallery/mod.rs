//! Gallery Service
//!
//! Handles uploads, photo records, reactions, timeline grouping, and the
//! download relay.

mod download;
pub mod keys;
mod photos;
mod reactions;
pub mod s3;
pub mod timeline;
mod uploads;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::AppState;

pub use s3::S3Client;

/// Create upload router: presign/confirm for direct-to-storage uploads,
/// plus the server-side fallback at the root.
pub fn upload_router() -> Router<AppState> {
    Router::new()
        .route("/", post(uploads::upload_direct))
        .route("/presign", post(uploads::presign_upload))
        .route("/confirm", post(uploads::confirm_upload))
}

/// Create photos router.
pub fn photos_router() -> Router<AppState> {
    Router::new()
        .route("/", get(photos::list))
        .route("/timeline", get(photos::timeline))
        .route("/{id}", delete(photos::delete))
}

/// Create reactions router.
pub fn reactions_router() -> Router<AppState> {
    Router::new().route("/", get(reactions::get_reactions).post(reactions::toggle))
}

/// Create download relay router.
pub fn download_router() -> Router<AppState> {
    Router::new().route("/", get(download::download))
}
