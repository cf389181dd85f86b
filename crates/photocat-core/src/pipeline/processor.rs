//! Pipeline orchestration - wires the per-file stages together.

use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::tagging::PendingTags;
use crate::types::{ExifData, PhotoRecord, UNREADABLE_LABEL};

use super::decode::{DecodePath, ImageDecoder};
use super::discovery::FileDiscovery;
use super::display::DisplayFitter;
use super::hash::ContentHasher;
use super::metadata::{self, MetadataExtractor};
use super::orientation;

/// A photo decoded, oriented upright and fitted for display.
pub struct MaterializedPhoto {
    pub path: PathBuf,
    pub filename: String,
    /// Display-ready pixels
    pub image: DynamicImage,
    /// Upright dimensions before display fitting
    pub source_width: u32,
    pub source_height: u32,
    pub exif: ExifData,
    pub decode_path: DecodePath,
}

impl MaterializedPhoto {
    /// Dimensions of the display-ready image.
    pub fn display_dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Runs discovery and the per-file stages for a library.
pub struct ImageProcessor {
    discovery: FileDiscovery,
    fitter: DisplayFitter,
}

impl ImageProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            discovery: FileDiscovery::new(config.library.clone()),
            fitter: DisplayFitter::new(config.display.clone()),
        }
    }

    /// Ordered list of catalogable photos under `root`.
    pub fn discover(&self, root: &Path) -> PipelineResult<Vec<PathBuf>> {
        self.discovery.discover(root)
    }

    /// Decode a photo, rotate it upright and fit it for display.
    pub fn materialize(&self, path: &Path) -> PipelineResult<MaterializedPhoto> {
        let start = std::time::Instant::now();
        tracing::debug!("Materializing: {:?}", path);

        if !path.is_file() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let decode_start = std::time::Instant::now();
        let decoded = ImageDecoder::decode(path)?;
        tracing::trace!("  Decode ({:?}): {:?}", decoded.decode_path, decode_start.elapsed());

        let metadata_start = std::time::Instant::now();
        let exif = MetadataExtractor::extract(path);
        tracing::trace!("  Metadata: {:?}", metadata_start.elapsed());

        let upright = orientation::normalize(decoded.image, exif.orientation);
        let (source_width, source_height) = upright.dimensions();

        let fit_start = std::time::Instant::now();
        let image = self.fitter.fit(upright);
        tracing::trace!("  Display fit: {:?}", fit_start.elapsed());

        let filename = metadata::file_name(path);
        tracing::debug!(
            "Materialized {:?} in {:?} ({}x{})",
            filename,
            start.elapsed(),
            source_width,
            source_height
        );

        Ok(MaterializedPhoto {
            path: path.to_path_buf(),
            filename,
            image,
            source_width,
            source_height,
            exif,
            decode_path: decoded.decode_path,
        })
    }

    /// Assemble the catalog record for a photo from its file attributes,
    /// fingerprint, EXIF and the operator's pending tags.
    ///
    /// Fails only when the file itself has gone away; a missing fingerprint
    /// or EXIF field leaves that column empty.
    pub fn build_record(&self, path: &Path, pending: &PendingTags) -> PipelineResult<PhotoRecord> {
        let attributes = MetadataExtractor::file_attributes(path)?;
        let fingerprint = ContentHasher::fingerprint(path);
        let exif = MetadataExtractor::extract(path);

        Ok(PhotoRecord {
            fingerprint,
            filename: attributes.filename,
            filepath: attributes.filepath,
            size_mb: Some(attributes.size_mb),
            format: attributes.format,
            date_created: exif.date_created,
            camera_model: exif.camera_model,
            shutter_speed: exif.shutter_speed,
            aperture: exif.aperture,
            rating: pending.rating,
            labels: pending.labels.to_column(),
            marked_for_deletion: pending.marked_for_deletion,
            do_not_delete: pending.do_not_delete,
            timestamp: None,
        })
    }

    /// Placeholder record for a photo that could not be decoded.
    pub fn degraded_record(&self, path: &Path) -> PhotoRecord {
        PhotoRecord {
            fingerprint: ContentHasher::fingerprint(path),
            filename: metadata::file_name(path),
            filepath: path.to_path_buf(),
            size_mb: None,
            format: metadata::format_token(path),
            date_created: None,
            camera_model: None,
            shutter_speed: None,
            aperture: None,
            rating: 0,
            labels: UNREADABLE_LABEL.to_string(),
            marked_for_deletion: false,
            do_not_delete: false,
            timestamp: None,
        }
    }
}
