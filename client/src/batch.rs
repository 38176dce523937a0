//! Batch Upload Orchestration
//!
//! The four-step flow per batch: local validation and EXIF extraction,
//! one presign request, concurrent direct PUTs, one confirm call.
//! Validation failures abort before any network transfer; a transfer
//! failure leaves zero records confirmed (already-written objects stay
//! orphaned in storage).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::future::try_join_all;
use futures::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::{debug, info};

use gala_common::{
    allowed_mime_type, ConfirmPhoto, ConfirmRequest, ConfirmResponse, PhotoResponse, PresignFile,
    PresignRequest, PresignResponse, PresignedFile, MAX_FILE_SIZE,
};
use gala_media::{extract_metadata, MediaMetadata};

use crate::error::UploadError;
use crate::progress::BatchProgress;

/// Transfer chunk size; each yielded chunk advances the progress counter.
const CHUNK_SIZE: usize = 64 * 1024;

/// One local file staged for upload.
#[derive(Debug)]
struct StagedFile {
    name: String,
    mime_type: String,
    data: Vec<u8>,
    metadata: MediaMetadata,
}

/// Batch upload client for a Gala gallery server.
#[derive(Clone)]
pub struct Uploader {
    http: reqwest::Client,
    server_url: String,
}

impl Uploader {
    /// Create an uploader for the given server base URL.
    #[must_use]
    pub fn new(server_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload a batch of files and return the created gallery records.
    ///
    /// Progress is observable through `progress` while the call runs.
    pub async fn upload_batch(
        &self,
        paths: &[PathBuf],
        uploader_name: &str,
        progress: &Arc<BatchProgress>,
    ) -> Result<Vec<PhotoResponse>, UploadError> {
        if paths.is_empty() {
            return Err(UploadError::NoFiles);
        }

        // Step 1: stage and validate everything before touching the network.
        let mut staged = Vec::with_capacity(paths.len());
        for path in paths {
            staged.push(stage_file(path).await?);
        }

        progress.set_total(staged.iter().map(|file| file.data.len() as u64).sum());

        // Step 2: one credential per file.
        let credentials = self.request_credentials(&staged, uploader_name).await?;

        // Step 3: concurrent direct PUTs, jointly awaited.
        try_join_all(
            staged
                .iter()
                .zip(&credentials)
                .map(|(file, credential)| self.transfer(file, credential, progress)),
        )
        .await?;

        // Step 4: confirm the whole batch in one call.
        self.confirm(&staged, &credentials, uploader_name).await
    }

    async fn request_credentials(
        &self,
        staged: &[StagedFile],
        uploader_name: &str,
    ) -> Result<Vec<PresignedFile>, UploadError> {
        let request = PresignRequest {
            uploader_name: Some(uploader_name.to_string()),
            files: staged
                .iter()
                .map(|file| PresignFile {
                    name: file.name.clone(),
                    mime_type: file.mime_type.clone(),
                    size: file.data.len() as u64,
                })
                .collect(),
        };

        let response = self
            .http
            .post(format!("{}/api/upload/presign", self.server_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| UploadError::Presign(err.to_string()))?;

        if !response.status().is_success() {
            return Err(UploadError::Presign(server_message(response).await));
        }

        let presigned: PresignResponse = response
            .json()
            .await
            .map_err(|err| UploadError::Presign(err.to_string()))?;

        if presigned.presigned_files.len() != staged.len() {
            return Err(UploadError::CredentialMismatch {
                got: presigned.presigned_files.len(),
                expected: staged.len(),
            });
        }

        debug!(files = staged.len(), "Received upload credentials");
        Ok(presigned.presigned_files)
    }

    async fn transfer(
        &self,
        file: &StagedFile,
        credential: &PresignedFile,
        progress: &Arc<BatchProgress>,
    ) -> Result<(), UploadError> {
        let size = file.data.len();
        let body = progress_body(file.data.clone(), Arc::clone(progress));

        let response = self
            .http
            .put(&credential.upload_url)
            // The credential is bound to this content type.
            .header(CONTENT_TYPE, &credential.mime_type)
            .header(CONTENT_LENGTH, size)
            .body(body)
            .send()
            .await
            .map_err(|err| UploadError::Transfer {
                name: file.name.clone(),
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(UploadError::Transfer {
                name: file.name.clone(),
                message: format!("storage answered {}", response.status()),
            });
        }

        debug!(file = %file.name, key = %credential.storage_key, "Transfer complete");
        Ok(())
    }

    async fn confirm(
        &self,
        staged: &[StagedFile],
        credentials: &[PresignedFile],
        uploader_name: &str,
    ) -> Result<Vec<PhotoResponse>, UploadError> {
        let request = ConfirmRequest {
            uploader_name: Some(uploader_name.to_string()),
            photos: staged
                .iter()
                .zip(credentials)
                .map(|(file, credential)| ConfirmPhoto {
                    storage_key: credential.storage_key.clone(),
                    file_name: credential.file_name.clone(),
                    public_url: credential.public_url.clone(),
                    mime_type: credential.mime_type.clone(),
                    file_size: file.data.len() as u64,
                    is_video: credential.is_video,
                    capture_date: file.metadata.date_taken,
                    latitude: file.metadata.latitude,
                    longitude: file.metadata.longitude,
                })
                .collect(),
        };

        let response = self
            .http
            .post(format!("{}/api/upload/confirm", self.server_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| UploadError::Confirm(err.to_string()))?;

        if !response.status().is_success() {
            return Err(UploadError::Confirm(server_message(response).await));
        }

        let confirmed: ConfirmResponse = response
            .json()
            .await
            .map_err(|err| UploadError::Confirm(err.to_string()))?;

        info!(photos = confirmed.photos.len(), "Upload batch confirmed");
        Ok(confirmed.photos)
    }
}

/// Pull the server's error message out of a failed response body.
async fn server_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(|value| value.as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("server answered {status}")),
        Err(_) => format!("server answered {status}"),
    }
}

/// Read a file, resolve its MIME type, validate it, and extract capture
/// metadata. The metadata pass is best-effort and never fails the batch.
async fn stage_file(path: &Path) -> Result<StagedFile, UploadError> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let data = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
        name: name.clone(),
        source,
    })?;

    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    if !allowed_mime_type(&mime_type) {
        return Err(UploadError::InvalidMimeType { name, mime_type });
    }
    if data.len() as u64 > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge {
            name,
            max_size: MAX_FILE_SIZE,
        });
    }

    let metadata = extract_metadata(&data, &mime_type);
    if let Some(date_taken) = metadata.date_taken {
        debug!(file = %name, %date_taken, "Capture date extracted");
    }

    Ok(StagedFile {
        name,
        mime_type,
        data,
        metadata,
    })
}

/// Wrap file bytes in a chunked body that advances the shared progress
/// counter as chunks are handed to the wire.
fn progress_body(data: Vec<u8>, progress: Arc<BatchProgress>) -> reqwest::Body {
    let chunks: Vec<Bytes> = data
        .chunks(CHUNK_SIZE)
        .map(|chunk| Bytes::copy_from_slice(chunk))
        .collect();

    let stream = futures::stream::iter(chunks).map(move |chunk| {
        progress.add_loaded(chunk.len() as u64);
        Ok::<Bytes, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}
