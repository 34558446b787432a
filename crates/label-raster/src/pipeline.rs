//! Label pipeline: rasterize → crop → threshold → compose → encode.
//!
//! The processing mode is fixed when the pipeline is built. In
//! [`LabelProcessing::PassThrough`] mode the rasterizer output is returned
//! untouched; in [`LabelProcessing::Full`] mode it is decoded and turned into
//! an 800x1200 print-ready PNG.

use std::io::Cursor;

use image::{DynamicImage, ImageReader};
use tracing::{debug, info};

use crate::compose::{blend_on_canvas, compose_on_canvas, encode_png};
use crate::crop::crop_label;
use crate::rasterize::Rasterizer;
use crate::threshold::threshold_label;
use crate::{LabelError, LabelOptions, LabelProcessing, Result};

/// Renders PDF labels with an injected [`Rasterizer`].
#[derive(Debug, Clone)]
pub struct LabelPipeline<R> {
    rasterizer: R,
    processing: LabelProcessing,
    options: LabelOptions,
}

impl<R: Rasterizer> LabelPipeline<R> {
    pub fn new(rasterizer: R, processing: LabelProcessing) -> Self {
        Self {
            rasterizer,
            processing,
            options: LabelOptions::default(),
        }
    }

    /// Builder: replace the processing options.
    pub fn with_options(mut self, options: LabelOptions) -> Self {
        self.options = options;
        self
    }

    pub fn processing(&self) -> LabelProcessing {
        self.processing
    }

    pub fn options(&self) -> &LabelOptions {
        &self.options
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Render a PDF label into the configured output.
    pub async fn render(&self, pdf: &[u8]) -> Result<Vec<u8>> {
        if pdf.is_empty() {
            return Err(LabelError::EmptyInput);
        }

        debug!(
            rasterizer = self.rasterizer.name(),
            pdf_len = pdf.len(),
            "Rasterizing label"
        );
        let raster = self.rasterizer.rasterize(pdf).await?;
        self.process_raster(&raster)
    }

    /// Post-process an already rasterized label according to the mode.
    pub fn process_raster(&self, raster: &[u8]) -> Result<Vec<u8>> {
        match self.processing {
            LabelProcessing::PassThrough => {
                debug!(len = raster.len(), "Pass-through mode, returning raster as-is");
                Ok(raster.to_vec())
            }
            LabelProcessing::Full => process_label(raster, &self.options),
        }
    }
}

/// Crop, threshold and compose an encoded raster into canvas PNG bytes.
pub fn process_label(raster: &[u8], options: &LabelOptions) -> Result<Vec<u8>> {
    if raster.is_empty() {
        return Err(LabelError::EmptyInput);
    }

    let decoded = decode_label(raster, options)?;
    let (src_width, src_height) = (decoded.width(), decoded.height());

    let cropped = crop_label(&decoded.to_rgba8(), options.crop_margin);
    let canvas = if options.threshold {
        compose_on_canvas(&threshold_label(&cropped))
    } else {
        blend_on_canvas(&cropped)
    };
    let png = encode_png(&canvas)?;

    info!(
        src_width,
        src_height,
        cropped_width = cropped.width(),
        cropped_height = cropped.height(),
        threshold = options.threshold,
        png_len = png.len(),
        "Label processed"
    );
    Ok(png)
}

/// Decode an image after checking its header dimensions against the limit.
fn decode_label(bytes: &[u8], options: &LabelOptions) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LabelError::Decode(format!("cannot detect image format: {e}")))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| LabelError::Decode(format!("cannot read image dimensions: {e}")))?;
    validate_pixel_limit(width, height, options.max_decoded_pixels)?;

    image::load_from_memory(bytes).map_err(|e| LabelError::Decode(e.to_string()))
}

fn validate_pixel_limit(width: u32, height: u32, limit: u64) -> Result<()> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels > limit {
        return Err(LabelError::ResourceLimit(format!(
            "label is {width}x{height} ({pixels} pixels), limit is {limit} pixels"
        )));
    }
    Ok(())
}
