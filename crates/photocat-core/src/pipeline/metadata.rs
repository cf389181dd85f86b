//! File attributes and EXIF metadata extraction.

use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{bytes_to_mb, ExifData, FileAttributes};

/// Extracts file attributes and EXIF metadata from image files.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Filename, location, size and format of an existing file.
    pub fn file_attributes(path: &Path) -> PipelineResult<FileAttributes> {
        let meta = std::fs::metadata(path)
            .map_err(|_| PipelineError::FileNotFound(path.to_path_buf()))?;
        Ok(FileAttributes {
            filename: file_name(path),
            filepath: path.to_path_buf(),
            size_mb: bytes_to_mb(meta.len()),
            format: format_token(path),
        })
    }

    /// Extract EXIF data from an image file.
    ///
    /// Never fails: an unreadable container yields an empty [`ExifData`], and
    /// each missing or malformed tag leaves only its own field absent.
    pub fn extract(path: &Path) -> ExifData {
        let exif = match Self::read_container(path) {
            Some(exif) => exif,
            None => return ExifData::default(),
        };

        ExifData {
            date_created: absorb(Self::get_datetime(&exif, path)),
            camera_model: absorb(Self::get_string(&exif, Tag::Model, "camera_model", path)),
            shutter_speed: absorb(Self::get_shutter_speed(&exif, path)),
            aperture: absorb(Self::get_aperture(&exif, path)),
            orientation: absorb(Self::get_u32(&exif, Tag::Orientation, "orientation", path)),
        }
    }

    fn read_container(path: &Path) -> Option<exif::Exif> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Some(exif),
            Err(e) => {
                tracing::debug!("No usable EXIF in {:?}: {}", path, e);
                None
            }
        }
    }

    fn missing(path: &Path, field: &'static str) -> PipelineError {
        PipelineError::MetadataFieldMissing {
            path: path.to_path_buf(),
            field,
        }
    }

    /// Get a string field from EXIF data.
    fn get_string(
        exif: &exif::Exif,
        tag: Tag,
        field: &'static str,
        path: &Path,
    ) -> PipelineResult<String> {
        exif.get_field(tag, In::PRIMARY)
            .map(|f| clean(&f.display_value().to_string()))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Self::missing(path, field))
    }

    /// Get a u32 field from EXIF data.
    fn get_u32(
        exif: &exif::Exif,
        tag: Tag,
        field: &'static str,
        path: &Path,
    ) -> PipelineResult<u32> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Short(v) => v.first().map(|&x| x as u32),
                Value::Long(v) => v.first().copied(),
                _ => None,
            })
            .ok_or_else(|| Self::missing(path, field))
    }

    /// Get the capture datetime from DateTimeOriginal.
    fn get_datetime(exif: &exif::Exif, path: &Path) -> PipelineResult<String> {
        Self::get_string(exif, Tag::DateTimeOriginal, "date_created", path)
    }

    /// Get aperture as a formatted string (e.g., "f/1.8").
    fn get_aperture(exif: &exif::Exif, path: &Path) -> PipelineResult<String> {
        exif.get_field(Tag::FNumber, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Rational(v) if v.first().is_some_and(|r| r.denom != 0) => {
                    Some(format!("f/{}", f.display_value()))
                }
                _ => None,
            })
            .ok_or_else(|| Self::missing(path, "aperture"))
    }

    /// Get shutter speed as a string (e.g., "1/1000").
    fn get_shutter_speed(exif: &exif::Exif, path: &Path) -> PipelineResult<String> {
        exif.get_field(Tag::ExposureTime, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Rational(v) if v.first().is_some_and(|r| r.denom != 0) => {
                    Some(f.display_value().to_string())
                }
                _ => None,
            })
            .ok_or_else(|| Self::missing(path, "shutter_speed"))
    }
}

fn absorb<T>(result: PipelineResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::trace!("{}", e);
            None
        }
    }
}

/// Clean up an EXIF display string (remove quotes and padding).
fn clean(s: &str) -> String {
    s.trim_matches('"').trim().to_string()
}

/// Just the filename portion of a path.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Uppercase extension token, e.g. `JPG` for `img.jpg`.
pub fn format_token(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}
