//! EXIF Extraction
//!
//! Reads the embedded capture timestamp and GPS coordinates from image
//! bytes. This path never fails its caller: corrupt containers, missing
//! tags, and non-image media all degrade to an empty result.

use std::io::Cursor;

use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use tracing::debug;

/// Metadata recovered from an uploaded file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaMetadata {
    /// Capture timestamp. EXIF timestamps carry no timezone.
    pub date_taken: Option<NaiveDateTime>,
    /// GPS latitude in decimal degrees. Present only together with longitude.
    pub latitude: Option<f64>,
    /// GPS longitude in decimal degrees. Present only together with latitude.
    pub longitude: Option<f64>,
}

impl MediaMetadata {
    /// Whether nothing was recovered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.date_taken.is_none() && self.latitude.is_none() && self.longitude.is_none()
    }
}

/// Extract capture timestamp and GPS position from raw file bytes.
///
/// Only image MIME types are attempted; everything else returns an empty
/// result immediately. The capture timestamp is taken from the first
/// present of `DateTimeOriginal`, `DateTimeDigitized`, `DateTime`.
#[must_use]
pub fn extract_metadata(data: &[u8], mime_type: &str) -> MediaMetadata {
    if !mime_type.starts_with("image/") {
        return MediaMetadata::default();
    }

    let mut cursor = Cursor::new(data);
    let parsed = match Reader::new().read_from_container(&mut cursor) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(mime_type = %mime_type, error = %err, "no usable EXIF container");
            return MediaMetadata::default();
        }
    };

    let date_taken = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime]
        .iter()
        .find_map(|tag| {
            parsed
                .get_field(*tag, In::PRIMARY)
                .and_then(|field| parse_exif_datetime(&field.value))
        });

    let latitude = gps_coordinate(
        parsed
            .get_field(Tag::GPSLatitude, In::PRIMARY)
            .and_then(|field| dms_components(&field.value)),
        parsed
            .get_field(Tag::GPSLatitudeRef, In::PRIMARY)
            .and_then(|field| exif_string(&field.value)),
    );
    let longitude = gps_coordinate(
        parsed
            .get_field(Tag::GPSLongitude, In::PRIMARY)
            .and_then(|field| dms_components(&field.value)),
        parsed
            .get_field(Tag::GPSLongitudeRef, In::PRIMARY)
            .and_then(|field| exif_string(&field.value)),
    );

    // A coordinate only makes sense as a pair.
    let (latitude, longitude) = match (latitude, longitude) {
        (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        _ => (None, None),
    };

    MediaMetadata {
        date_taken,
        latitude,
        longitude,
    }
}

fn exif_string(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(values) => values
            .first()
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .map(|s| s.trim_matches('\u{0}').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn parse_exif_datetime(value: &Value) -> Option<NaiveDateTime> {
    let raw = exif_string(value)?;
    NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S").ok()
}

fn dms_components(value: &Value) -> Option<[f64; 3]> {
    match value {
        Value::Rational(values) if values.len() >= 3 => Some([
            values[0].to_f64(),
            values[1].to_f64(),
            values[2].to_f64(),
        ]),
        _ => None,
    }
}

/// Convert a degrees/minutes/seconds triplet plus hemisphere reference
/// into signed decimal degrees.
fn gps_coordinate(components: Option<[f64; 3]>, reference: Option<String>) -> Option<f64> {
    let [degrees, minutes, seconds] = components?;
    let mut sign = 1.0;
    if let Some(reference) = reference {
        if matches!(reference.trim().to_ascii_uppercase().as_str(), "S" | "W") {
            sign = -1.0;
        }
    }
    Some(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}
