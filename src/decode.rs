//! Decode and downsample art files for display.
//!
//! Covers arrive at whatever resolution the server has; list tiles only
//! need a small fraction of that. The dimensions are probed from the file
//! header first, then the image is decoded and shrunk by a power-of-two
//! factor so both sides land strictly below the display bound.
//!
//! Decode failures are absorbed: a corrupt or unsupported file is logged
//! and treated as missing art, never surfaced as an error.

use std::path::Path;

use image::RgbaImage;
use image::imageops::FilterType;
use tracing::debug;

/// Smallest power-of-two divisor that brings both dimensions strictly
/// under `max_dimension`; 1 if the source is already smaller.
fn sample_factor(width: u32, height: u32, max_dimension: u32) -> u32 {
    let mut w = width;
    let mut h = height;
    let mut factor = 1;
    while w >= max_dimension || h >= max_dimension {
        w /= 2;
        h /= 2;
        factor *= 2;
    }
    factor
}

/// Decode the image at `path`, downsampled to fit under `max_dimension`.
///
/// Sources already below the bound are decoded untouched. Returns `None`
/// if the bounds probe or the decode fails for any reason.
pub fn decode(path: &Path, max_dimension: u32) -> Option<RgbaImage> {
    let max_dimension = max_dimension.max(1);

    let (width, height) = match image::image_dimensions(path) {
        Ok(size) => size,
        Err(e) => {
            debug!("Decoding bounds of {:?} failed: {}", path, e);
            return None;
        }
    };

    let image = match image::open(path) {
        Ok(image) => image,
        Err(e) => {
            debug!("Decoding {:?} failed: {}", path, e);
            return None;
        }
    };

    let factor = sample_factor(width, height, max_dimension);
    if factor == 1 {
        return Some(image.into_rgba8());
    }

    let scaled = image.resize_exact(
        (width / factor).max(1),
        (height / factor).max(1),
        FilterType::Triangle,
    );
    Some(scaled.into_rgba8())
}
