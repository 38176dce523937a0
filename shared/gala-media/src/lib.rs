//! Gala Media Metadata
//!
//! Best-effort extraction of capture timestamp and GPS position from
//! uploaded media. Used by the server's fallback upload path and by the
//! uploader client before a presigned upload.

mod exif_data;

pub use exif_data::{extract_metadata, MediaMetadata};
