//! Text acquisition: resolve the user's input and turn it into raw text.
//!
//! - [`preprocess`] — grayscale + adaptive threshold before recognition.
//! - [`tesseract`] — [`OcrEngine`] backed by the `tesseract` executable.

use std::io::Read;
use std::path::{Path, PathBuf};

use image::GrayImage;
use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::error::{AcquisitionError, AnalysisError};

pub mod preprocess;
pub mod tesseract;

/// Input for one analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Encoded raster image (JPEG, PNG, ...).
    Image(Vec<u8>),
    Text(String),
}

/// Where the user asked us to read input from.
#[derive(Debug, Clone, Default)]
pub struct InputSources {
    pub image: Option<PathBuf>,
    pub text: Option<String>,
    /// Text file to read; `-` means stdin.
    pub text_file: Option<PathBuf>,
}

/// Recognises text in a preprocessed grayscale image.
#[allow(async_fn_in_trait)]
pub trait OcrEngine {
    async fn recognize(&self, image: &GrayImage) -> Result<String, AcquisitionError>;
}

/// Pick the input to analyze. An image always wins over text.
///
/// Blank text counts as absent.
pub fn resolve_input(sources: &InputSources) -> Result<RawInput, AnalysisError> {
    if let Some(path) = &sources.image {
        let bytes = std::fs::read(path).map_err(|source| read_error(path, source))?;
        return Ok(RawInput::Image(bytes));
    }

    let text = match (&sources.text, &sources.text_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(read_text_file(path)?),
        (None, None) => None,
    };

    match text {
        Some(text) if !text.trim().is_empty() => Ok(RawInput::Text(text)),
        _ => Err(AnalysisError::NoInput),
    }
}

fn read_text_file(path: &Path) -> Result<String, AcquisitionError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| read_error(path, source))?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|source| read_error(path, source))
}

fn read_error(path: &Path, source: std::io::Error) -> AcquisitionError {
    AcquisitionError::ReadInput {
        path: path.to_path_buf(),
        source,
    }
}

/// Produce raw text from the input. Text passes through unchanged; images are
/// decoded, preprocessed and handed to `engine`.
pub async fn acquire_text<E: OcrEngine>(
    input: RawInput,
    engine: &E,
    settings: &OcrConfig,
) -> Result<String, AcquisitionError> {
    match input {
        RawInput::Text(text) => Ok(text),
        RawInput::Image(bytes) => {
            let decoded = image::load_from_memory(&bytes)?;
            debug!(
                width = decoded.width(),
                height = decoded.height(),
                "decoded label image"
            );
            let prepared = preprocess::preprocess(&decoded, settings.block_size, settings.offset);
            let text = engine.recognize(&prepared).await?;
            info!(chars = text.len(), "OCR finished");
            Ok(text)
        }
    }
}
