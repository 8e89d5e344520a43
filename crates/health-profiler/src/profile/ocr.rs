use std::io::Write;
use std::process::{Command, Stdio};
use tracing::warn;

/// Turns an uploaded survey image into plain text.
///
/// Implementations never fail outward: anything that goes wrong yields an
/// empty string, which the parser then rejects as an incomplete survey.
pub trait SurveyTextExtractor: Send + Sync {
    fn extract_text(&self, image: &[u8]) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("failed to run OCR command '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("failed to stream image to OCR command: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR command stdin unavailable")]
    StdinUnavailable,
    #[error("OCR command exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
}

/// Runs the `tesseract` CLI, piping the image through stdin.
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    command: String,
    language: String,
}

impl TesseractExtractor {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    fn run(&self, image: &[u8]) -> Result<String, OcrError> {
        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OcrError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // stdin is dropped before waiting so the tool sees EOF.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(image).map_err(OcrError::from),
            None => Err(OcrError::StdinUnavailable),
        };

        // Always reap the child, even when it exited before reading the image.
        let output = child.wait_with_output()?;
        written?;
        if !output.status.success() {
            return Err(OcrError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl SurveyTextExtractor for TesseractExtractor {
    fn extract_text(&self, image: &[u8]) -> String {
        match self.run(image) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, bytes = image.len(), "survey image OCR failed");
                String::new()
            }
        }
    }
}
