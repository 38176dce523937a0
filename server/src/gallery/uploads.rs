//! Upload Handling
//!
//! The direct-to-storage flow is presign → client PUT → confirm; the
//! multipart endpoint is the server-side fallback for clients that cannot
//! PUT to storage themselves. Validation happens for the whole batch
//! before any credential is issued or byte transferred: one bad file
//! rejects everything.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDateTime;
use thiserror::Error;

use gala_common::{
    allowed_mime_type, is_video_mime, ConfirmRequest, ConfirmResponse, PresignRequest,
    PresignResponse, PresignedFile,
};
use gala_media::extract_metadata;

use super::keys::generate_storage_key;
use crate::api::AppState;
use crate::db;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during upload operations.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File uploads are not configured.
    #[error("File uploads are not configured")]
    NotConfigured,

    /// No file provided.
    #[error("No files provided")]
    NoFiles,

    /// File too large.
    #[error("File too large: {name}. Maximum is {max_size} bytes")]
    TooLarge {
        /// Name of the offending file.
        name: String,
        /// Maximum allowed size in bytes.
        max_size: usize,
    },

    /// MIME type outside the allow-list.
    #[error("File type not allowed: {mime_type} ({name})")]
    InvalidMimeType {
        /// Name of the offending file.
        name: String,
        /// The rejected MIME type.
        mime_type: String,
    },

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_NOT_CONFIGURED",
                self.to_string(),
            ),
            Self::NoFiles => (StatusCode::BAD_REQUEST, "NO_FILES", self.to_string()),
            Self::TooLarge { .. } => {
                (StatusCode::BAD_REQUEST, "FILE_TOO_LARGE", self.to_string())
            }
            Self::InvalidMimeType { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_MIME_TYPE",
                self.to_string(),
            ),
            Self::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "Storage operation failed".to_string(),
            ),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database operation failed".to_string(),
            ),
            Self::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Normalize the guest display name: trimmed, `None` when empty.
///
/// Key generation applies its own placeholder for anonymous guests.
fn normalize_uploader(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

/// Reject a file outside the allow-list or over the size cap.
fn validate_file(name: &str, mime_type: &str, size: u64, max_size: usize) -> Result<(), UploadError> {
    if !allowed_mime_type(mime_type) {
        return Err(UploadError::InvalidMimeType {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        });
    }
    if size > max_size as u64 {
        return Err(UploadError::TooLarge {
            name: name.to_string(),
            max_size,
        });
    }
    Ok(())
}

/// Validate file content against its claimed MIME type using magic byte
/// detection. Only used on the server-side fallback path, where the bytes
/// pass through this process.
fn validate_file_content(name: &str, data: &[u8], claimed_mime: &str) -> Result<(), UploadError> {
    let Some(kind) = infer::get(data) else {
        tracing::warn!(
            file = %name,
            claimed_mime = %claimed_mime,
            size = data.len(),
            "File content does not match any known magic byte signature"
        );
        return Err(UploadError::InvalidMimeType {
            name: name.to_string(),
            mime_type: format!("{claimed_mime} (content unrecognizable)"),
        });
    };

    let detected = kind.mime_type();
    if detected == claimed_mime {
        return Ok(());
    }

    // Known equivalent pairs the detector reports differently
    let compatible = matches!(
        (claimed_mime, detected),
        ("image/heic", "image/heif") | ("video/quicktime", "video/mp4")
    );
    if compatible {
        return Ok(());
    }

    tracing::warn!(
        file = %name,
        claimed_mime = %claimed_mime,
        detected_mime = %detected,
        "File content type mismatch"
    );
    Err(UploadError::InvalidMimeType {
        name: name.to_string(),
        mime_type: format!("{claimed_mime} (detected: {detected})"),
    })
}

/// GPS coordinates only make sense as a pair; a half-present pair from a
/// client is stored as absent.
const fn paired_gps(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> (Option<f64>, Option<f64>) {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        _ => (None, None),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Issue one upload credential per file for a direct-to-storage batch.
///
/// POST /api/upload/presign
#[utoipa::path(
    post,
    path = "/api/upload/presign",
    tag = "uploads",
    request_body = PresignRequest,
    responses(
        (status = 200, body = PresignResponse),
        (status = 400, description = "Disallowed type or oversize file"),
        (status = 503, description = "Storage not configured"),
    ),
)]
#[tracing::instrument(skip(state, req))]
pub async fn presign_upload(
    State(state): State<AppState>,
    Json(req): Json<PresignRequest>,
) -> Result<Json<PresignResponse>, UploadError> {
    if req.files.is_empty() {
        return Err(UploadError::NoFiles);
    }

    // The whole batch is validated before any credential is issued.
    for file in &req.files {
        validate_file(
            &file.name,
            &file.mime_type,
            file.size,
            state.config.max_upload_size,
        )?;
    }

    let s3 = state.s3.as_ref().ok_or(UploadError::NotConfigured)?;

    let uploader = normalize_uploader(req.uploader_name.as_deref());
    let uploader_name = uploader.as_deref().unwrap_or_default();

    let mut presigned_files = Vec::with_capacity(req.files.len());
    for file in &req.files {
        // Capture date is unknown before the bytes exist server-side;
        // the key is stamped with today instead.
        let key = generate_storage_key(uploader_name, &file.mime_type, None);
        let credential = s3
            .presign_put(&key.storage_key, &file.mime_type)
            .await
            .map_err(|e| UploadError::Storage(e.to_string()))?;

        presigned_files.push(PresignedFile {
            upload_url: credential.upload_url,
            public_url: credential.public_url,
            storage_key: key.storage_key,
            file_name: key.file_name,
            mime_type: file.mime_type.clone(),
            file_size: file.size,
            is_video: is_video_mime(&file.mime_type),
        });
    }

    tracing::info!(
        files = presigned_files.len(),
        "Issued upload credentials"
    );

    Ok(Json(PresignResponse { presigned_files }))
}

/// Persist a batch of transferred files, all-or-nothing.
///
/// POST /api/upload/confirm
///
/// Called after the client has PUT every file directly to storage with
/// its presigned credential.
#[utoipa::path(
    post,
    path = "/api/upload/confirm",
    tag = "uploads",
    request_body = ConfirmRequest,
    responses(
        (status = 201, body = ConfirmResponse),
    ),
)]
#[tracing::instrument(skip(state, req))]
pub async fn confirm_upload(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Result<(StatusCode, Json<ConfirmResponse>), UploadError> {
    if req.photos.is_empty() {
        return Err(UploadError::NoFiles);
    }

    let uploader = normalize_uploader(req.uploader_name.as_deref());

    let gps: Vec<(Option<f64>, Option<f64>)> = req
        .photos
        .iter()
        .map(|photo| paired_gps(photo.latitude, photo.longitude))
        .collect();

    let new_photos: Vec<db::NewPhoto<'_>> = req
        .photos
        .iter()
        .zip(&gps)
        .map(|(photo, (latitude, longitude))| db::NewPhoto {
            file_path: &photo.storage_key,
            file_name: &photo.file_name,
            file_size: photo.file_size as i64,
            mime_type: &photo.mime_type,
            storage_url: &photo.public_url,
            s3_key: Some(&photo.storage_key),
            uploader_name: uploader.as_deref(),
            is_video: photo.is_video,
            date_taken: photo.capture_date,
            latitude: *latitude,
            longitude: *longitude,
        })
        .collect();

    let created = db::insert_photos_batch(&state.db, &new_photos).await?;

    tracing::info!(photos = created.len(), "Upload batch confirmed");

    Ok((
        StatusCode::CREATED,
        Json(ConfirmResponse {
            photos: created.into_iter().map(Into::into).collect(),
        }),
    ))
}

/// Server-side upload fallback: bytes pass through this process instead
/// of going straight to storage.
///
/// POST /api/upload
///
/// Expects multipart form with:
/// - `uploaderName`: optional guest display name
/// - `files`: one or more file parts
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_direct(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ConfirmResponse>), UploadError> {
    let s3 = state.s3.as_ref().ok_or(UploadError::NotConfigured)?;

    let mut uploader_name: Option<String> = None;
    let mut files: Vec<(String, String, Vec<u8>)> = Vec::new();

    // Parse multipart form
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "uploaderName" => {
                uploader_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| UploadError::Validation(e.to_string()))?,
                );
            }
            "files" => {
                let file_name = field.file_name().unwrap_or("arquivo").to_string();
                let declared_type = field.content_type().map(String::from);

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Validation(e.to_string()))?;

                let mime_type = declared_type
                    .or_else(|| {
                        mime_guess::from_path(&file_name)
                            .first()
                            .map(|m| m.to_string())
                    })
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                files.push((file_name, mime_type, data.to_vec()));
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    if files.is_empty() {
        return Err(UploadError::NoFiles);
    }

    // Validate the whole batch before transferring anything.
    for (name, mime_type, data) in &files {
        validate_file(name, mime_type, data.len() as u64, state.config.max_upload_size)?;
        validate_file_content(name, data, mime_type)?;
    }

    let uploader = normalize_uploader(uploader_name.as_deref());
    let uploader_slug_name = uploader.as_deref().unwrap_or_default();

    struct Transferred {
        key: super::keys::GeneratedKey,
        public_url: String,
        mime_type: String,
        size: i64,
        date_taken: Option<NaiveDateTime>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    }

    let mut transferred = Vec::with_capacity(files.len());
    for (name, mime_type, data) in files {
        // Capture metadata is best-effort and never blocks the upload.
        let metadata = extract_metadata(&data, &mime_type);
        let key = generate_storage_key(uploader_slug_name, &mime_type, metadata.date_taken);

        let size = data.len() as i64;
        let public_url = s3
            .upload(&key.storage_key, data, &mime_type)
            .await
            .map_err(|e| {
                tracing::error!(file = %name, key = %key.storage_key, "Upload transfer failed: {e}");
                UploadError::Storage(format!("{name}: {e}"))
            })?;

        let (latitude, longitude) = paired_gps(metadata.latitude, metadata.longitude);
        transferred.push(Transferred {
            key,
            public_url,
            mime_type,
            size,
            date_taken: metadata.date_taken,
            latitude,
            longitude,
        });
    }

    let new_photos: Vec<db::NewPhoto<'_>> = transferred
        .iter()
        .map(|file| db::NewPhoto {
            file_path: &file.key.storage_key,
            file_name: &file.key.file_name,
            file_size: file.size,
            mime_type: &file.mime_type,
            storage_url: &file.public_url,
            s3_key: Some(&file.key.storage_key),
            uploader_name: uploader.as_deref(),
            is_video: is_video_mime(&file.mime_type),
            date_taken: file.date_taken,
            latitude: file.latitude,
            longitude: file.longitude,
        })
        .collect();

    let created = db::insert_photos_batch(&state.db, &new_photos).await?;

    tracing::info!(photos = created.len(), "Server-side upload completed");

    Ok((
        StatusCode::CREATED,
        Json(ConfirmResponse {
            photos: created.into_iter().map(Into::into).collect(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_rejects_disallowed_type() {
        let err = validate_file("doc.pdf", "application/pdf", 10, 100).unwrap_err();
        assert!(matches!(err, UploadError::InvalidMimeType { .. }));
    }

    #[test]
    fn test_validate_file_rejects_oversize() {
        let err = validate_file("big.jpg", "image/jpeg", 101, 100).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
    }

    #[test]
    fn test_validate_file_accepts_at_limit() {
        assert!(validate_file("ok.jpg", "image/jpeg", 100, 100).is_ok());
    }

    #[test]
    fn test_normalize_uploader() {
        assert_eq!(normalize_uploader(Some("  Ana  ")), Some("Ana".to_string()));
        assert_eq!(normalize_uploader(Some("   ")), None);
        assert_eq!(normalize_uploader(None), None);
    }

    #[test]
    fn test_paired_gps_drops_half_pairs() {
        assert_eq!(paired_gps(Some(1.0), None), (None, None));
        assert_eq!(paired_gps(None, Some(2.0)), (None, None));
        assert_eq!(paired_gps(Some(1.0), Some(2.0)), (Some(1.0), Some(2.0)));
    }

    #[test]
    fn test_magic_bytes_mismatch_rejected() {
        // PNG magic bytes claimed as JPEG
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let err = validate_file_content("fake.jpg", &png, "image/jpeg").unwrap_err();
        assert!(matches!(err, UploadError::InvalidMimeType { .. }));
    }

    #[test]
    fn test_magic_bytes_match_accepted() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(validate_file_content("real.png", &png, "image/png").is_ok());
    }
}
