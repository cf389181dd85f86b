//! Image decoding through the standard codecs or the RAW path.

use image::DynamicImage;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

use super::raw;

/// Which decoder produced the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePath {
    /// `image` crate codecs (JPEG, PNG, TIFF, BMP, GIF)
    Standard,
    /// rawloader + demosaic (NEF, CR2, DNG)
    Raw,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Decoder used
    pub decode_path: DecodePath,
}

/// Decodes image files, dispatching on extension.
pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode an image file.
    ///
    /// Any failure is reported as [`PipelineError::UnreadableImage`]; the
    /// file handle is closed before this returns.
    pub fn decode(path: &Path) -> PipelineResult<DecodedImage> {
        let (result, decode_path) = if raw::is_raw(path) {
            (raw::decode_raw(path), DecodePath::Raw)
        } else {
            (Self::decode_standard(path), DecodePath::Standard)
        };

        let image = result.map_err(|message| PipelineError::UnreadableImage {
            path: path.to_path_buf(),
            message,
        })?;

        Ok(DecodedImage { image, decode_path })
    }

    /// Decode with format detection by content, falling back to extension.
    fn decode_standard(path: &Path) -> Result<DynamicImage, String> {
        let reader = image::ImageReader::open(path)
            .map_err(|e| format!("Cannot open file: {}", e))?
            .with_guessed_format()
            .map_err(|e| format!("Cannot detect image format: {}", e))?;
        reader.decode().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgb, RgbImage};

    #[test]
    fn test_decode_png() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("small.png");
        RgbImage::from_pixel(6, 3, Rgb([10, 20, 30])).save(&path).unwrap();

        let decoded = ImageDecoder::decode(&path).unwrap();
        assert_eq!(decoded.image.dimensions(), (6, 3));
        assert_eq!(decoded.decode_path, DecodePath::Standard);
    }

    #[test]
    fn test_format_detected_by_content() {
        // PNG bytes behind a .jpg extension still decode
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("misnamed.jpg");
        RgbImage::new(2, 2)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        assert!(ImageDecoder::decode(&path).is_ok());
    }

    #[test]
    fn test_truncated_jpeg_is_unreadable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("truncated.jpg");
        std::fs::write(&path, b"\xFF\xD8\xFF\xE0\x00\x10JFIF").unwrap();

        let err = ImageDecoder::decode(&path).err().unwrap();
        assert!(matches!(err, PipelineError::UnreadableImage { .. }));
    }

    #[test]
    fn test_corrupt_raw_is_unreadable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("DSC_0001.NEF");
        std::fs::write(&path, vec![0x4Du8; 512]).unwrap();

        let err = ImageDecoder::decode(&path).err().unwrap();
        assert!(matches!(err, PipelineError::UnreadableImage { .. }));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = ImageDecoder::decode(Path::new("/nonexistent/a.png"))
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::UnreadableImage { .. }));
    }
}
