//! Shipping label rasterization for thermal printer output.
//!
//! Turns a one-page PDF label into an 800x1200 black-and-white PNG:
//! rasterize at 216 dpi with an external tool, crop the top margin and
//! sides, threshold to pure black/white, and paste onto a fixed canvas.

pub mod compose;
pub mod crop;
pub mod options;
pub mod pipeline;
pub mod rasterize;
pub mod threshold;

// Re-exports for convenience
pub use compose::{blend_on_canvas, compose_on_canvas, encode_png};
pub use crop::{crop_label, find_first_ink_row};
pub use options::{LabelOptions, LabelProcessing};
pub use pipeline::{LabelPipeline, process_label};
pub use rasterize::{CommandRasterizer, Rasterizer};
pub use threshold::{luminance_milli, threshold_label, threshold_pixel};

/// Canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 800;

/// Canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1200;

/// Rasterization resolution expected by the label layout.
pub const DEFAULT_DPI: u32 = 216;

/// Rows of white kept above the first printed row when cropping.
pub const CROP_MARGIN: u32 = 8;

/// Errors raised by the external rasterizer process.
#[derive(Debug, thiserror::Error)]
pub enum ExternalToolError {
    #[error("Failed to start rasterizer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Rasterizer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rasterizer exited with {}: {stderr}", describe_exit(.code))]
    Exit { code: Option<i32>, stderr: String },

    #[error("Rasterizer did not finish within {after:?}")]
    Timeout { after: std::time::Duration },

    #[error("Rasterizer produced malformed output: {0}")]
    MalformedOutput(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Errors that can occur while producing a label image.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    #[error("Label input is empty")]
    EmptyInput,

    #[error("Failed to decode label image: {0}")]
    Decode(String),

    #[error("Failed to encode label image: {0}")]
    Encode(String),

    #[error("Resource limit: {0}")]
    ResourceLimit(String),
}

/// Result type alias for label operations.
pub type Result<T> = std::result::Result<T, LabelError>;
