use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Reasons a single analysis request is aborted.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no input provided: pass an image (--image) or an ingredient list")]
    NoInput,

    #[error("no valid ingredients detected in the input")]
    NoValidIngredients,

    #[error("text acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),
}

/// Failures while turning an image or text source into raw text.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("cannot read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image could not be processed: {0}")]
    Image(#[from] image::ImageError),

    #[error("OCR engine `{0}` is not installed or not on PATH")]
    EngineUnavailable(String),

    #[error("OCR engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    #[error("OCR engine did not finish within {0:?}")]
    Timeout(Duration),

    #[error("OCR engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR engine produced non UTF-8 output")]
    InvalidOutput,
}
