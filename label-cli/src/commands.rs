//! Command implementations shared by the binary and tests.

use std::path::Path;

use anyhow::Context;
use label_raster::{LabelPipeline, Rasterizer};
use tracking_number::TrackingNumber;

/// Check digit for a tracking number prefix.
pub fn check_digit(prefix: &str) -> anyhow::Result<u8> {
    tracking_number::check_digit(prefix.trim())
        .with_context(|| format!("cannot compute check digit for {prefix:?}"))
}

/// Full tracking number built from its prefix.
pub fn complete(prefix: &str) -> anyhow::Result<TrackingNumber> {
    TrackingNumber::from_prefix(prefix.trim())
        .with_context(|| format!("cannot complete tracking number {prefix:?}"))
}

/// Validate a full tracking number, returning the reason when it is invalid.
pub fn validate(number: &str) -> Result<TrackingNumber, tracking_number::TrackingError> {
    TrackingNumber::parse(number)
}

/// Render a PDF label file into a PNG file.
pub async fn render_label<R: Rasterizer>(
    pipeline: &LabelPipeline<R>,
    input: &Path,
    output: &Path,
) -> anyhow::Result<usize> {
    let pdf = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    let png = pipeline
        .render(&pdf)
        .await
        .with_context(|| format!("failed to render label {}", input.display()))?;
    tokio::fs::write(output, &png)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        bytes = png.len(),
        "Label written"
    );
    Ok(png.len())
}

/// Post-process an already rasterized label file.
pub async fn process_label<R: Rasterizer>(
    pipeline: &LabelPipeline<R>,
    input: &Path,
    output: &Path,
) -> anyhow::Result<usize> {
    let raster = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    let png = pipeline
        .process_raster(&raster)
        .with_context(|| format!("failed to process label {}", input.display()))?;
    tokio::fs::write(output, &png)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        bytes = png.len(),
        "Label written"
    );
    Ok(png.len())
}
