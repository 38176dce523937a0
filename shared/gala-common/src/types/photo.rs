//! Photo Record Wire Type

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted photo/video record as served by the gallery API.
///
/// Field names mirror the relational columns (snake_case on the wire).
/// `date_taken` is timezone-naive: EXIF capture timestamps carry no zone.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    /// Record ID.
    pub id: Uuid,
    /// When the record was created (upload confirmation time).
    pub created_at: DateTime<Utc>,
    /// Storage key (kept as `file_path` for schema compatibility).
    pub file_path: String,
    /// Display filename.
    pub file_name: String,
    /// File size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Public access URL.
    pub storage_url: String,
    /// Storage key, if the object lives in object storage.
    pub s3_key: Option<String>,
    /// Guest display name, if provided.
    pub uploader_name: Option<String>,
    /// Whether this record is a video.
    pub is_video: bool,
    /// Embedded capture timestamp, if the media carried one.
    pub date_taken: Option<NaiveDateTime>,
    /// GPS latitude in decimal degrees (paired with longitude).
    pub latitude: Option<f64>,
    /// GPS longitude in decimal degrees (paired with latitude).
    pub longitude: Option<f64>,
}
