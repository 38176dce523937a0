//! Upload Validation Constants
//!
//! The allow-list and size cap are enforced on both sides: the client
//! rejects a batch before any network transfer, the server rejects again
//! at the presign and fallback-upload endpoints.

/// Image MIME types accepted for upload.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/heic",
];

/// Video MIME types accepted for upload.
pub const ALLOWED_VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime"];

/// Maximum accepted file size in bytes (100 MB).
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Whether a MIME type is in the upload allow-list.
#[must_use]
pub fn allowed_mime_type(mime_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&mime_type) || ALLOWED_VIDEO_TYPES.contains(&mime_type)
}

/// Whether a MIME type is a video type.
#[must_use]
pub fn is_video_mime(mime_type: &str) -> bool {
    mime_type.starts_with("video/")
}
