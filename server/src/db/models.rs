//! Database Models

use chrono::{DateTime, NaiveDateTime, Utc};
use gala_common::PhotoResponse;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Photo/video record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub file_path: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub storage_url: String,
    pub s3_key: Option<String>,
    pub uploader_name: Option<String>,
    pub is_video: bool,
    pub date_taken: Option<NaiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            created_at: photo.created_at,
            file_path: photo.file_path,
            file_name: photo.file_name,
            file_size: photo.file_size,
            mime_type: photo.mime_type,
            storage_url: photo.storage_url,
            s3_key: photo.s3_key,
            uploader_name: photo.uploader_name,
            is_video: photo.is_video,
            date_taken: photo.date_taken,
            latitude: photo.latitude,
            longitude: photo.longitude,
        }
    }
}

/// Insert parameters for a new photo record.
///
/// `id` and `created_at` are generated by the database.
#[derive(Debug, Clone)]
pub struct NewPhoto<'a> {
    pub file_path: &'a str,
    pub file_name: &'a str,
    pub file_size: i64,
    pub mime_type: &'a str,
    pub storage_url: &'a str,
    pub s3_key: Option<&'a str>,
    pub uploader_name: Option<&'a str>,
    pub is_video: bool,
    pub date_taken: Option<NaiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Reaction row: one per (photo, viewer session).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PhotoReaction {
    pub id: Uuid,
    pub photo_id: Uuid,
    pub emoji: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}
