//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{
    extract::DefaultBodyLimit, extract::State, routing::get, Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, gallery, gallery::S3Client};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// S3 client for media storage (optional — uploads disabled without it)
    pub s3: Option<S3Client>,
    /// HTTP client for the download relay
    pub http: reqwest::Client,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: PgPool, config: Config, s3: Option<S3Client>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            s3,
            http: reqwest::Client::new(),
        }
    }

    /// Check if S3 storage is configured and available.
    #[must_use]
    pub const fn has_s3(&self) -> bool {
        self.s3.is_some()
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Get max upload size from config for the fallback upload path
    let max_upload_size = state.config.max_upload_size;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Gallery API
        .nest("/api/upload", gallery::upload_router())
        .nest("/api/photos", gallery::photos_router())
        .nest("/api/reactions", gallery::reactions_router())
        .nest("/api/download", gallery::download_router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // Increase body limit for the server-side upload fallback (default is 2MB)
        .layer(DefaultBodyLimit::max(max_upload_size))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether object storage is configured
    storage: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage: state.has_s3(),
    })
}
