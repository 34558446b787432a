//! Cropping of rasterized labels.
//!
//! The rendered page carries a white top margin and is wider than the
//! printer canvas. The crop keeps a few rows above the first printed row,
//! centers horizontally on the canvas width and never trims the bottom.

use image::RgbaImage;
use tracing::debug;

use crate::CANVAS_WIDTH;

/// Find the first row whose pixel on the vertical midline is not pure white.
///
/// Only RGB is compared; alpha is ignored. When no such row exists the last
/// row index is returned, which makes an empty page crop down to almost
/// nothing instead of failing.
pub fn find_first_ink_row(img: &RgbaImage) -> u32 {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return height.saturating_sub(1);
    }

    let x = width / 2;
    (0..height)
        .find(|&y| {
            let p = img.get_pixel(x, y);
            p[0] != 255 || p[1] != 255 || p[2] != 255
        })
        .unwrap_or(height - 1)
}

/// Crop a label to the canvas width, keeping `margin` rows above the ink.
///
/// Returns an image at most [`CANVAS_WIDTH`] wide whose height is the
/// original height minus the cropped top rows.
pub fn crop_label(img: &RgbaImage, margin: u32) -> RgbaImage {
    let (width, height) = img.dimensions();

    let first_ink_row = find_first_ink_row(img);
    let crop_top = first_ink_row.saturating_sub(margin);
    let crop_left = width.saturating_sub(CANVAS_WIDTH) / 2;
    let crop_width = CANVAS_WIDTH.min(width - crop_left);
    let crop_height = height - crop_top;

    debug!(
        width,
        height,
        first_ink_row,
        crop_left,
        crop_top,
        crop_width,
        crop_height,
        "Cropping label"
    );

    image::imageops::crop_imm(img, crop_left, crop_top, crop_width, crop_height).to_image()
}
