//! Threshold conversion for thermal printer output.
//!
//! Anti-aliased and partially transparent pixels are reduced to pure
//! black or white so the printer never has to guess.

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

/// Luminance below which an opaque pixel prints black.
const LUMA_THRESHOLD: u32 = 127;

/// Alpha above which a pixel counts as opaque.
const ALPHA_THRESHOLD: u8 = 127;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Perceptual luminance (0.299 R + 0.587 G + 0.114 B) scaled by 1000.
///
/// Integer weights keep the comparison against the threshold exact.
pub fn luminance_milli(pixel: &Rgba<u8>) -> u32 {
    299 * u32::from(pixel[0]) + 587 * u32::from(pixel[1]) + 114 * u32::from(pixel[2])
}

/// Map a single RGBA pixel to black or white.
///
/// Fully transparent pixels are white whatever their color. Otherwise a
/// pixel is black only if its luminance is strictly below 127 and its alpha
/// is above 127.
pub fn threshold_pixel(pixel: &Rgba<u8>) -> Rgb<u8> {
    let alpha = pixel[3];
    if alpha == 0 {
        return WHITE;
    }

    if luminance_milli(pixel) < LUMA_THRESHOLD * 1000 && alpha > ALPHA_THRESHOLD {
        BLACK
    } else {
        WHITE
    }
}

/// Threshold every pixel of a label, producing a two-color RGB image.
pub fn threshold_label(img: &RgbaImage) -> RgbImage {
    let (width, height) = img.dimensions();
    debug!(width, height, "Applying label threshold");

    let mut output = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels() {
        output.put_pixel(x, y, threshold_pixel(pixel));
    }

    output
}
