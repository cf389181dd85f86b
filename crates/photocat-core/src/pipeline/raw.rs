//! RAW sensor decoding.
//!
//! Loads sensor data with rawloader and develops it into 8-bit sRGB-ish RGB:
//! black/white level scaling, as-shot white balance, a full-resolution
//! bilinear demosaic for CFA sensors, and a 2.2 gamma curve.

use image::{DynamicImage, Rgb, RgbImage};
use rawloader::{RawImage, RawImageData};
use std::path::Path;

/// Extensions routed through the RAW decode path.
pub const RAW_EXTENSIONS: &[&str] = &["nef", "cr2", "dng"];

/// Whether a path should be decoded as RAW.
pub fn is_raw(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| RAW_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode and develop a RAW file into an RGB image.
pub fn decode_raw(path: &Path) -> Result<DynamicImage, String> {
    let decoder = rawloader::RawLoader::new();
    let raw = decoder
        .decode_file(path)
        .map_err(|e| format!("Failed to decode RAW: {:?}", e))?;

    tracing::trace!(
        "Loaded RAW sensor data: {}x{} cpp={} cfa={}",
        raw.width,
        raw.height,
        raw.cpp,
        raw.cfa.name
    );

    develop(&SensorFrame::from_raw(&raw))
}

/// Sensor samples in whichever representation the decoder produced.
enum Samples<'a> {
    Integer(&'a [u16]),
    Float(&'a [f32]),
}

impl Samples<'_> {
    fn len(&self) -> usize {
        match self {
            Samples::Integer(v) => v.len(),
            Samples::Float(v) => v.len(),
        }
    }
}

/// Everything `develop` needs from a decoded RAW file.
struct SensorFrame<'a> {
    width: usize,
    height: usize,
    cpp: usize,
    samples: Samples<'a>,
    levels: Levels,
    crops: [usize; 4],
    cfa: Option<CfaTile>,
}

impl<'a> SensorFrame<'a> {
    fn from_raw(raw: &'a RawImage) -> Self {
        let samples = match &raw.data {
            RawImageData::Integer(v) => Samples::Integer(v.as_slice()),
            RawImageData::Float(v) => Samples::Float(v.as_slice()),
        };
        let cfa = raw
            .cfa
            .is_valid()
            .then(|| CfaTile::from_fn(|row, col| raw.cfa.color_at(row, col)));

        Self {
            width: raw.width,
            height: raw.height,
            cpp: raw.cpp,
            samples,
            levels: Levels {
                black: raw.blacklevels.map(f32::from),
                white: raw.whitelevels.map(f32::from),
                wb: white_balance(raw.wb_coeffs),
            },
            crops: raw.crops,
            cfa,
        }
    }

    /// Linear 0..1 value of sample `index`, scaled with `channel`'s levels.
    fn sample(&self, index: usize, channel: usize) -> f32 {
        let channel = channel.min(3);
        match &self.samples {
            Samples::Integer(v) => {
                let range = (self.levels.white[channel] - self.levels.black[channel]).max(1.0);
                (v[index] as f32 - self.levels.black[channel]) / range
            }
            Samples::Float(v) => v[index],
        }
    }
}

fn develop(frame: &SensorFrame) -> Result<DynamicImage, String> {
    let expected = frame.width * frame.height * frame.cpp;
    let available = frame.samples.len();
    if frame.width == 0 || frame.height == 0 || available < expected {
        return Err(format!(
            "Truncated sensor data: {} samples for {}x{}x{}",
            available, frame.width, frame.height, frame.cpp
        ));
    }

    let area = CropArea::new(frame.width, frame.height, frame.crops);

    let image = match (frame.cpp, &frame.cfa) {
        (1, Some(cfa)) => bilinear(frame, cfa, &area)?,
        (1, None) => monochrome(frame, &area),
        (3, _) => linear_rgb(frame, &area),
        (other, _) => {
            return Err(format!("Unsupported sensor layout: {other} components per pixel"))
        }
    };
    Ok(DynamicImage::ImageRgb8(image))
}

/// Largest CFA repeat period handled; Bayer (2) and X-Trans (6) divide it.
const CFA_PERIOD: usize = 48;

/// One period of the color filter layout, sampled from the decoder's CFA.
struct CfaTile {
    colors: [[u8; CFA_PERIOD]; CFA_PERIOD],
}

impl CfaTile {
    fn from_fn(color_at: impl Fn(usize, usize) -> usize) -> Self {
        let mut colors = [[0u8; CFA_PERIOD]; CFA_PERIOD];
        for (row, line) in colors.iter_mut().enumerate() {
            for (col, color) in line.iter_mut().enumerate() {
                *color = color_at(row, col).min(3) as u8;
            }
        }
        Self { colors }
    }

    fn color_at(&self, row: usize, col: usize) -> usize {
        self.colors[row % CFA_PERIOD][col % CFA_PERIOD] as usize
    }
}

/// Active sensor area after applying the decoder's crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CropArea {
    top: usize,
    left: usize,
    width: usize,
    height: usize,
}

impl CropArea {
    /// `crops` is `[top, right, bottom, left]`; crops that would leave no
    /// pixels are ignored.
    fn new(width: usize, height: usize, crops: [usize; 4]) -> Self {
        let [top, right, bottom, left] = crops;
        if top + bottom < height && left + right < width {
            Self {
                top,
                left,
                width: width - left - right,
                height: height - top - bottom,
            }
        } else {
            Self {
                top: 0,
                left: 0,
                width,
                height,
            }
        }
    }
}

/// Per-channel scaling from raw sample to linear 0..1.
struct Levels {
    black: [f32; 4],
    white: [f32; 4],
    wb: [f32; 3],
}

/// As-shot multipliers normalized to green; missing or invalid become 1.0.
fn white_balance(coeffs: [f32; 4]) -> [f32; 3] {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(coeffs[1]) {
        return [1.0, 1.0, 1.0];
    }
    let green = coeffs[1];
    let scale = |v: f32| if valid(v) { v / green } else { 1.0 };
    [scale(coeffs[0]), 1.0, scale(coeffs[2])]
}

/// Linear 0..1 to gamma-encoded 8-bit.
fn encode(v: f32) -> u8 {
    (v.clamp(0.0, 1.0).powf(1.0 / 2.2) * 255.0).round() as u8
}

/// Full-resolution bilinear demosaic over the active area.
///
/// Each pixel keeps its own sample for its filter color and takes the mean
/// of its 3x3 neighbours for the other two. A color with no neighbour in the
/// window falls back to the pixel's own sample.
fn bilinear(frame: &SensorFrame, cfa: &CfaTile, area: &CropArea) -> Result<RgbImage, String> {
    if area.width < 2 || area.height < 2 {
        return Err(format!("Sensor area {}x{} too small", area.width, area.height));
    }

    // (output channel, linear value) at active-area coordinates
    let site = |x: usize, y: usize| {
        let row = area.top + y;
        let col = area.left + x;
        let color = cfa.color_at(row, col);
        // Fourth CFA color (e.g. emerald) is folded into green
        let channel = if color > 2 { 1 } else { color };
        (channel, frame.sample(row * frame.width + col, color))
    };

    let mut image = RgbImage::new(area.width as u32, area.height as u32);
    for y in 0..area.height {
        for x in 0..area.width {
            let (own, value) = site(x, y);
            let mut sum = [0f32; 3];
            let mut count = [0u32; 3];
            for ny in y.saturating_sub(1)..=(y + 1).min(area.height - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(area.width - 1) {
                    if (nx, ny) == (x, y) {
                        continue;
                    }
                    let (channel, v) = site(nx, ny);
                    sum[channel] += v;
                    count[channel] += 1;
                }
            }

            let mut px = [0u8; 3];
            for c in 0..3 {
                let v = if c == own || count[c] == 0 {
                    value
                } else {
                    sum[c] / count[c] as f32
                };
                px[c] = encode(v * frame.levels.wb[c]);
            }
            image.put_pixel(x as u32, y as u32, Rgb(px));
        }
    }
    Ok(image)
}

/// Sensors without a color filter.
fn monochrome(frame: &SensorFrame, area: &CropArea) -> RgbImage {
    let mut image = RgbImage::new(area.width as u32, area.height as u32);
    for y in 0..area.height {
        for x in 0..area.width {
            let index = (area.top + y) * frame.width + area.left + x;
            let v = encode(frame.sample(index, 0));
            image.put_pixel(x as u32, y as u32, Rgb([v, v, v]));
        }
    }
    image
}

/// Already-demosaiced data (linear DNG), three samples per pixel.
fn linear_rgb(frame: &SensorFrame, area: &CropArea) -> RgbImage {
    let mut image = RgbImage::new(area.width as u32, area.height as u32);
    for y in 0..area.height {
        for x in 0..area.width {
            let base = ((area.top + y) * frame.width + area.left + x) * 3;
            let px = [
                encode(frame.sample(base, 0)),
                encode(frame.sample(base + 1, 1)),
                encode(frame.sample(base + 2, 2)),
            ];
            image.put_pixel(x as u32, y as u32, Rgb(px));
        }
    }
    image
}
