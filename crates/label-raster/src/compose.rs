//! Canvas composition — paste a label onto the fixed printer canvas.
//!
//! The canvas is always [`CANVAS_WIDTH`] x [`CANVAS_HEIGHT`]. Labels are
//! anchored at the top-left corner and never scaled: anything beyond the
//! canvas is dropped, anything short of it stays white.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

use crate::{CANVAS_HEIGHT, CANVAS_WIDTH, LabelError, Result};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn blank_canvas() -> RgbImage {
    RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, WHITE)
}

/// Copy `label` onto a fresh white canvas at (0, 0), clipping the excess.
pub fn compose_on_canvas(label: &RgbImage) -> RgbImage {
    let mut canvas = blank_canvas();
    let (width, height) = label.dimensions();
    debug!(width, height, "Composing label onto canvas");

    for (x, y, pixel) in label.enumerate_pixels() {
        if x < CANVAS_WIDTH && y < CANVAS_HEIGHT {
            canvas.put_pixel(x, y, *pixel);
        }
    }

    canvas
}

/// Alpha-composite an RGBA label onto a fresh white canvas at (0, 0).
///
/// Used when thresholding is disabled so transparent regions stay white
/// instead of collapsing to their stored color.
pub fn blend_on_canvas(label: &RgbaImage) -> RgbImage {
    let mut canvas = blank_canvas();
    let (width, height) = label.dimensions();
    debug!(width, height, "Blending label onto canvas");

    for (x, y, pixel) in label.enumerate_pixels() {
        if x < CANVAS_WIDTH && y < CANVAS_HEIGHT {
            let alpha = f32::from(pixel[3]) / 255.0;
            if alpha > 0.99 {
                canvas.put_pixel(x, y, Rgb([pixel[0], pixel[1], pixel[2]]));
            } else if alpha > 0.01 {
                let bg = *canvas.get_pixel(x, y);
                canvas.put_pixel(x, y, blend_pixel(bg, pixel, alpha));
            }
        }
    }

    canvas
}

fn blend_pixel(bg: Rgb<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgb<u8> {
    let inv = 1.0 - alpha;
    Rgb([
        (f32::from(fg[0]) * alpha + f32::from(bg[0]) * inv) as u8,
        (f32::from(fg[1]) * alpha + f32::from(bg[1]) * inv) as u8,
        (f32::from(fg[2]) * alpha + f32::from(bg[2]) * inv) as u8,
    ])
}

/// Encode a canvas as PNG bytes.
pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| LabelError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn compose_small_label_pads_with_white() {
        let label = RgbImage::from_pixel(100, 50, BLACK);
        let canvas = compose_on_canvas(&label);
        assert_eq!(canvas.dimensions(), (800, 1200));
        assert_eq!(*canvas.get_pixel(0, 0), BLACK);
        assert_eq!(*canvas.get_pixel(99, 49), BLACK);
        assert_eq!(*canvas.get_pixel(100, 49), WHITE);
        assert_eq!(*canvas.get_pixel(99, 50), WHITE);
        assert_eq!(*canvas.get_pixel(799, 1199), WHITE);
    }

    #[test]
    fn compose_oversized_label_is_clipped() {
        let mut label = RgbImage::from_pixel(900, 1500, BLACK);
        label.put_pixel(799, 1199, Rgb([10, 20, 30]));
        let canvas = compose_on_canvas(&label);
        assert_eq!(canvas.dimensions(), (800, 1200));
        assert_eq!(*canvas.get_pixel(799, 1199), Rgb([10, 20, 30]));
        assert_eq!(*canvas.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn compose_empty_label_is_blank_canvas() {
        let canvas = compose_on_canvas(&RgbImage::new(0, 0));
        assert_eq!(canvas.dimensions(), (800, 1200));
        assert!(canvas.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn blend_transparent_pixels_stay_white() {
        let label = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        let canvas = blend_on_canvas(&label);
        assert_eq!(*canvas.get_pixel(5, 5), WHITE);
    }

    #[test]
    fn blend_opaque_pixels_are_copied() {
        let label = RgbaImage::from_pixel(10, 10, Rgba([40, 50, 60, 255]));
        let canvas = blend_on_canvas(&label);
        assert_eq!(*canvas.get_pixel(9, 9), Rgb([40, 50, 60]));
        assert_eq!(*canvas.get_pixel(10, 9), WHITE);
    }

    #[test]
    fn blend_half_alpha_mixes_with_white() {
        let label = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let canvas = blend_on_canvas(&label);
        let p = canvas.get_pixel(0, 0);
        assert!(p[0] > 100 && p[0] < 150, "unexpected blend {p:?}");
    }

    #[test]
    fn blend_does_not_panic_on_oversized_label() {
        let label = RgbaImage::from_pixel(1000, 1300, Rgba([0, 0, 0, 255]));
        let canvas = blend_on_canvas(&label);
        assert_eq!(canvas.dimensions(), (800, 1200));
    }

    #[test]
    fn encode_png_round_trips_dimensions() {
        let canvas = compose_on_canvas(&RgbImage::from_pixel(4, 4, BLACK));
        let bytes = encode_png(&canvas).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 1200));
    }
}
