//! Core data types for the photocat catalog.
//!
//! [`PhotoRecord`] is the logical row shape persisted by every
//! [`CatalogStore`](crate::catalog::CatalogStore) backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Label stored on the placeholder record of a photo that could not be decoded.
pub const UNREADABLE_LABEL: &str = "could not open image";

/// Highest star rating an operator can assign. Zero means unset.
pub const MAX_RATING: u8 = 4;

/// One catalog row per distinct file content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    // === Identity ===
    /// SHA-256 of the file bytes, absent only when hashing failed
    pub fingerprint: Option<String>,

    /// Last observed filename
    pub filename: String,

    /// Last observed location
    pub filepath: PathBuf,

    // === File attributes ===
    /// File size in megabytes, rounded to two decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_mb: Option<f64>,

    /// Uppercase extension token ("JPG", "NEF", ...)
    pub format: String,

    // === Capture metadata ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,

    // === Operator tags ===
    /// Star rating 0-4
    pub rating: u8,

    /// Single category token or comma-joined sorted category set
    pub labels: String,

    pub marked_for_deletion: bool,

    pub do_not_delete: bool,

    /// Last write time, assigned by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PhotoRecord {
    /// Whether this is the placeholder written for an undecodable photo.
    pub fn is_unreadable_placeholder(&self) -> bool {
        self.labels == UNREADABLE_LABEL
    }
}

/// File-level attributes that are always available for an existing file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttributes {
    pub filename: String,
    pub filepath: PathBuf,
    pub size_mb: f64,
    pub format: String,
}

/// EXIF fields the catalog records, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExifData {
    /// Capture time as written by the camera ("2024-03-01 14:22:05")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,

    /// Exposure time (e.g., "1/250")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,

    /// Aperture (e.g., "f/2.8")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,

    /// Raw EXIF orientation code (1-8)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u32>,
}

/// How categories are assigned within one catalog.
///
/// Chosen once per catalog; the two schemes are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// At most one category per photo
    Single,
    /// Any set of categories per photo
    #[default]
    Multi,
}

impl fmt::Display for LabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelMode::Single => f.write_str("single-select"),
            LabelMode::Multi => f.write_str("multi-select"),
        }
    }
}

/// Round a byte count to megabytes with two decimals.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    (mb * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_mb_rounds_to_two_decimals() {
        assert_eq!(bytes_to_mb(0), 0.0);
        assert_eq!(bytes_to_mb(1024 * 1024), 1.0);
        assert_eq!(bytes_to_mb(1_500_000), 1.43);
    }

    #[test]
    fn test_label_mode_serde() {
        let mode: LabelMode = serde_json::from_str("\"single\"").unwrap();
        assert_eq!(mode, LabelMode::Single);
        assert_eq!(serde_json::to_string(&LabelMode::Multi).unwrap(), "\"multi\"");
    }

    #[test]
    fn test_exif_data_skips_absent_fields() {
        let exif = ExifData {
            camera_model: Some("NIKON D750".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&exif).unwrap();
        assert!(json.contains("camera_model"));
        assert!(!json.contains("aperture"));
    }
}
