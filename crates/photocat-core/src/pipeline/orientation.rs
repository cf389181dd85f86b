//! EXIF orientation normalization.

use image::DynamicImage;

/// Rotation needed to display an image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    /// EXIF orientation 3
    Half,
    /// EXIF orientation 6
    Clockwise,
    /// EXIF orientation 8
    CounterClockwise,
}

impl Rotation {
    /// Map an EXIF orientation code. Mirrored orientations (2, 4, 5, 7)
    /// and unknown codes are left as stored.
    pub fn from_exif(code: Option<u32>) -> Self {
        match code {
            Some(3) => Self::Half,
            Some(6) => Self::Clockwise,
            Some(8) => Self::CounterClockwise,
            _ => Self::None,
        }
    }

    /// Apply this rotation to an image.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::None => image,
            Self::Half => image.rotate180(),
            Self::Clockwise => image.rotate90(),
            Self::CounterClockwise => image.rotate270(),
        }
    }
}

/// Rotate an image upright according to its EXIF orientation code.
pub fn normalize(image: DynamicImage, orientation: Option<u32>) -> DynamicImage {
    let rotation = Rotation::from_exif(orientation);
    if rotation != Rotation::None {
        tracing::trace!("Applying orientation {:?}: {:?}", orientation, rotation);
    }
    rotation.apply(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    const A: Rgb<u8> = Rgb([255, 0, 0]);
    const B: Rgb<u8> = Rgb([0, 0, 255]);

    /// 2x1 image: A on the left, B on the right.
    fn strip() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, A);
        img.put_pixel(1, 0, B);
        DynamicImage::ImageRgb8(img)
    }

    fn pixel(image: &DynamicImage, x: u32, y: u32) -> Rgb<u8> {
        image.to_rgb8().get_pixel(x, y).to_owned()
    }

    #[test]
    fn test_orientation_3_rotates_half_turn() {
        let out = normalize(strip(), Some(3));
        assert_eq!(out.dimensions(), (2, 1));
        assert_eq!(pixel(&out, 0, 0), B);
        assert_eq!(pixel(&out, 1, 0), A);
    }

    #[test]
    fn test_orientation_6_rotates_clockwise() {
        let out = normalize(strip(), Some(6));
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(pixel(&out, 0, 0), A);
        assert_eq!(pixel(&out, 0, 1), B);
    }

    #[test]
    fn test_orientation_8_rotates_counter_clockwise() {
        let out = normalize(strip(), Some(8));
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(pixel(&out, 0, 0), B);
        assert_eq!(pixel(&out, 0, 1), A);
    }

    #[test]
    fn test_other_codes_unchanged() {
        for code in [None, Some(1), Some(2), Some(5), Some(7), Some(42)] {
            let out = normalize(strip(), code);
            assert_eq!(out.dimensions(), (2, 1), "code {:?}", code);
            assert_eq!(pixel(&out, 0, 0), A);
        }
    }
}
