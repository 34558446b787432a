//! Label processing options.
//!
//! `LabelProcessing` decides once, at construction time, whether rasterized
//! labels are post-processed at all. `LabelOptions` tunes the full pipeline.

use std::fmt;
use std::str::FromStr;

use crate::CROP_MARGIN;

/// Post-processing strategy applied to rasterizer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelProcessing {
    /// Crop, threshold and compose onto the fixed canvas.
    #[default]
    Full,
    /// Return the rasterizer output unchanged.
    PassThrough,
}

impl LabelProcessing {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::PassThrough => "passthrough",
        }
    }
}

impl fmt::Display for LabelProcessing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelProcessing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "passthrough" | "pass-through" => Ok(Self::PassThrough),
            other => Err(format!(
                "unknown label processing mode '{other}' (expected 'full' or 'passthrough')"
            )),
        }
    }
}

/// Tuning for the full processing pipeline.
#[derive(Debug, Clone)]
pub struct LabelOptions {
    /// Rows kept above the first printed row.
    pub crop_margin: u32,

    /// Binarize pixels to pure black/white. When disabled the cropped label is
    /// alpha-blended onto the white canvas instead.
    pub threshold: bool,

    /// Upper bound on `width * height` of a decoded raster.
    pub max_decoded_pixels: u64,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            crop_margin: CROP_MARGIN,
            threshold: true,
            max_decoded_pixels: 40_000_000,
        }
    }
}

impl LabelOptions {
    /// Create options with the standard label defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set crop margin.
    pub fn with_crop_margin(mut self, val: u32) -> Self {
        self.crop_margin = val;
        self
    }

    /// Builder: set threshold flag.
    pub fn with_threshold(mut self, val: bool) -> Self {
        self.threshold = val;
        self
    }

    /// Builder: set decoded pixel limit.
    ///
    /// # Panics
    /// Panics if the limit is zero.
    pub fn with_max_decoded_pixels(mut self, val: u64) -> Self {
        assert!(val > 0, "Decoded pixel limit must be positive");
        self.max_decoded_pixels = val;
        self
    }
}
