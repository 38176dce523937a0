//! Upload Flow Wire Types
//!
//! The presign/confirm pair drives the direct-to-storage upload flow:
//! the client requests one write credential per file, PUTs bytes straight
//! to storage, then confirms the whole batch in a single call.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::photo::PhotoResponse;

/// One file announced in a presign request.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PresignFile {
    /// Client-side filename (informational only; never used as a key).
    pub name: String,
    /// Declared MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// Body of `POST /api/upload/presign`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    /// Guest display name; empty or missing falls back to a placeholder.
    #[serde(default)]
    pub uploader_name: Option<String>,
    /// Files to issue credentials for.
    pub files: Vec<PresignFile>,
}

/// One issued upload credential.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignedFile {
    /// Time-limited write-only URL for a direct PUT.
    pub upload_url: String,
    /// Public URL the object will have once written.
    pub public_url: String,
    /// Generated storage key.
    pub storage_key: String,
    /// Generated display filename.
    pub file_name: String,
    /// MIME type the credential is bound to.
    pub mime_type: String,
    /// Declared size in bytes.
    pub file_size: u64,
    /// Whether the file is a video.
    pub is_video: bool,
}

/// Response of `POST /api/upload/presign`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignResponse {
    /// One credential per requested file, in request order.
    pub presigned_files: Vec<PresignedFile>,
}

/// One transferred file being confirmed.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPhoto {
    /// Storage key the bytes were written under.
    pub storage_key: String,
    /// Display filename.
    pub file_name: String,
    /// Public URL of the written object.
    pub public_url: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Whether the file is a video.
    pub is_video: bool,
    /// Extracted capture timestamp, if any.
    #[serde(default)]
    pub capture_date: Option<NaiveDateTime>,
    /// Extracted GPS latitude (paired with longitude).
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Extracted GPS longitude (paired with latitude).
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Body of `POST /api/upload/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    /// Guest display name; empty or missing falls back to a placeholder.
    #[serde(default)]
    pub uploader_name: Option<String>,
    /// Transferred files to persist, all-or-nothing.
    pub photos: Vec<ConfirmPhoto>,
}

/// Response of `POST /api/upload/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConfirmResponse {
    /// Created records, in request order.
    pub photos: Vec<PhotoResponse>,
}
