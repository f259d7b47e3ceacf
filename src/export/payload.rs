//! Decoding of downloaded export files
//!
//! The download endpoint answers with the generated file as base64 text,
//! sometimes wrapped in a JSON string.

use super::error::ExportError;
use super::types::ExportFormat;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::{Path, PathBuf};

/// A decoded export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// File name derived from the export format
    pub file_name: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    /// Decode a download response body
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidPayload` if the body is not base64 (or a
    /// JSON string holding base64).
    pub fn decode(format: ExportFormat, body: &str) -> Result<Self, ExportError> {
        let body = body.trim();
        let encoded = if body.starts_with('"') {
            serde_json::from_str::<String>(body)
                .map_err(|e| ExportError::InvalidPayload(e.to_string()))?
        } else {
            body.to_string()
        };

        let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD.decode(cleaned)?;

        Ok(Self {
            file_name: format.file_name().to_string(),
            bytes,
        })
    }

    /// Write the file into `dir`, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` if the directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}
