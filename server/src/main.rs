//! Gala Server - Main Entry Point
//!
//! Collaborative wedding photo/video gallery backend.

use anyhow::Result;
use tracing::info;

use gala_server::{api, config, db, gallery};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gala_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Gala Server"
    );

    // Initialize database
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    // Initialize S3 client (optional - uploads will be disabled if not configured)
    let s3 = match gallery::S3Client::new(&config) {
        Ok(client) => {
            // Verify bucket access
            match client.health_check().await {
                Ok(()) => {
                    info!(bucket = %config.s3_bucket, "S3 storage connected");
                    Some(client)
                }
                Err(e) => {
                    tracing::warn!("S3 health check failed: {}. Uploads disabled.", e);
                    None
                }
            }
        }
        Err(e) => {
            tracing::warn!(
                "S3 client initialization failed: {}. Uploads disabled.",
                e
            );
            None
        }
    };

    // Build application state
    let bind_address = config.bind_address.clone();
    let state = api::AppState::new(db_pool, config, s3);

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
