use std::io::Cursor;
use std::process::Stdio;
use std::time::Duration;

use image::{DynamicImage, GrayImage, ImageOutputFormat};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::OcrEngine;
use crate::config::OcrConfig;
use crate::error::AcquisitionError;

/// Runs the `tesseract` CLI, feeding it a PNG on stdin and reading text from stdout.
pub struct TesseractEngine {
    command: String,
    language: String,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn from_config(config: &OcrConfig) -> Self {
        TesseractEngine {
            command: config.command.clone(),
            language: config.language.clone(),
            timeout: config.timeout(),
        }
    }
}

impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image: &GrayImage) -> Result<String, AcquisitionError> {
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image.clone())
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;

        debug!(command = %self.command, lang = %self.language, bytes = png.len(), "invoking OCR");

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    AcquisitionError::EngineUnavailable(self.command.clone())
                }
                _ => AcquisitionError::Io(e),
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AcquisitionError::Io(std::io::Error::other("stdin not captured")))?;
        let writer = tokio::spawn(async move {
            stdin.write_all(&png).await?;
            stdin.shutdown().await
        });

        // Dropping the child on timeout kills the process.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| AcquisitionError::Timeout(self.timeout))??;

        if let Ok(Err(e)) = writer.await {
            warn!(error = %e, "failed writing image to OCR engine");
        }

        if !output.status.success() {
            return Err(AcquisitionError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| AcquisitionError::InvalidOutput)
    }
}
