//! Gala Uploader - CLI Entry Point
//!
//! Uploads a batch of photos/videos to a Gala gallery server, printing
//! aggregated transfer progress while the batch runs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use gala_uploader::{BatchProgress, Uploader};

#[derive(Parser)]
#[command(
    name = "gala-uploader",
    about = "Upload photos and videos to a Gala wedding gallery",
    version
)]
struct Cli {
    /// Gallery server base URL
    #[arg(long, env = "GALA_SERVER_URL", default_value = "http://localhost:8080")]
    server: String,

    /// Guest display name shown next to the uploads
    #[arg(long, default_value = "")]
    name: String,

    /// Files to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gala_uploader=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let uploader = Uploader::new(&cli.server);
    let progress = Arc::new(BatchProgress::new());

    info!(
        files = cli.files.len(),
        server = %cli.server,
        "Starting upload batch"
    );

    // Print aggregated progress until the batch settles.
    let reporter = {
        let progress = Arc::clone(&progress);
        tokio::spawn(async move {
            let mut last = 0;
            loop {
                tokio::time::sleep(Duration::from_millis(500)).await;
                let percent = progress.percent();
                if percent != last {
                    info!(percent, "Transferring");
                    last = percent;
                }
            }
        })
    };

    let result = uploader
        .upload_batch(&cli.files, &cli.name, &progress)
        .await;
    reporter.abort();

    let photos = result?;
    for photo in &photos {
        info!(
            file = %photo.file_name,
            url = %photo.storage_url,
            "Uploaded"
        );
    }
    info!(photos = photos.len(), "Batch complete");

    Ok(())
}
