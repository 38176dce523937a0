//! Storage Key Generation
//!
//! Derives the display filename and storage key for an upload:
//! `{photos|videos}/casamento_{YYYYMMDD}_{name-slug}_{suffix}.{ext}`.
//! The random suffix makes keys practically collision-free, so two
//! concurrent uploads never race for the same key.

use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

/// Slugs are capped so very long guest names don't blow up the key.
const MAX_SLUG_LEN: usize = 20;

/// Placeholder for guests who left the name field empty.
const GUEST_PLACEHOLDER: &str = "convidado";

/// A generated filename/key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedKey {
    /// Display filename, e.g. `casamento_20261219_joao-silva_a1b2c3d4.jpg`.
    pub file_name: String,
    /// Storage key, e.g. `photos/casamento_20261219_joao-silva_a1b2c3d4.jpg`.
    pub storage_key: String,
}

/// Generate the display filename and storage key for one upload.
///
/// The date stamp uses the capture date when known, otherwise the current
/// time. Unknown MIME types get a generic `bin` extension rather than
/// failing.
#[must_use]
pub fn generate_storage_key(
    uploader_name: &str,
    mime_type: &str,
    capture_date: Option<NaiveDateTime>,
) -> GeneratedKey {
    let ext = extension_for_mime(mime_type);
    let folder = if mime_type.starts_with("video/") {
        "videos"
    } else {
        "photos"
    };

    let date = capture_date.unwrap_or_else(|| Utc::now().naive_utc());
    let date_stamp = date.format("%Y%m%d");

    let slug = slugify_name(uploader_name);
    let suffix_source = Uuid::new_v4().simple().to_string();
    let suffix = &suffix_source[..8];

    let file_name = format!("casamento_{date_stamp}_{slug}_{suffix}.{ext}");
    let storage_key = format!("{folder}/{file_name}");

    GeneratedKey {
        file_name,
        storage_key,
    }
}

/// Map a MIME type to a file extension.
fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

/// Turn a guest name into a storage-key-safe slug: fold diacritics, drop
/// punctuation, lowercase, collapse whitespace runs to single hyphens,
/// truncate. An empty result falls back to the guest placeholder.
fn slugify_name(name: &str) -> String {
    let folded: String = name.chars().map(fold_diacritic).collect();

    let cleaned: String = folded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let slug: String = cleaned
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    let slug: String = slug.chars().take(MAX_SLUG_LEN).collect();

    if slug.is_empty() {
        GUEST_PLACEHOLDER.to_string()
    } else {
        slug
    }
}

/// Fold common Latin accented characters to their ASCII base letter.
///
/// Covers the Portuguese alphabet plus the usual western-European guests.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}
