//! Main decoder API
//!
//! The `Decoder` struct bundles a `DecoderConfig` with the two input paths:
//! ZIP archives of logger exports (bulk mode) and standalone export files
//! (single-file mode). The two modes differ in how a missing `<Data>`
//! section is treated.

use crate::archive::{aggregate_with_config, decode_text_lossy};
use crate::config::DecoderConfig;
use crate::section::{extract_readings, extract_readings_strict, sanitize_text};
use crate::types::{Reading, Result};
use std::path::Path;

/// Entry point for decoding logger exports
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a custom configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode every matching entry of a ZIP archive
    ///
    /// Entries without a data section contribute no readings. A buffer that
    /// is not a ZIP archive fails with `DecoderError::InvalidArchive`.
    ///
    /// # Example
    /// ```no_run
    /// use asper_log_decoder::Decoder;
    ///
    /// let bytes = std::fs::read("exports.zip").unwrap();
    /// let readings = Decoder::new().decode_archive(&bytes).unwrap();
    /// println!("Parsed {} readings.", readings.len());
    /// ```
    pub fn decode_archive(&self, archive_bytes: &[u8]) -> Result<Vec<Reading>> {
        aggregate_with_config(archive_bytes, &self.config)
    }

    /// Decode a standalone export file
    ///
    /// The text is always sanitized before the section search, and a file
    /// without a data section fails with `DecoderError::MissingDataSection`.
    pub fn decode_file(&self, path: &Path) -> Result<Vec<Reading>> {
        log::info!("Decoding data file: {:?}", path);

        let bytes = std::fs::read(path)?;
        let readings = self.decode_file_bytes(&bytes)?;

        log::info!("Decoded {} readings from {:?}", readings.len(), path);
        Ok(readings)
    }

    /// Single-file decoding of an in-memory buffer
    pub fn decode_file_bytes(&self, bytes: &[u8]) -> Result<Vec<Reading>> {
        let text = sanitize_text(&decode_text_lossy(bytes));
        extract_readings_strict(&text)
    }

    /// Bulk-mode decoding of already extracted text
    pub fn decode_text(&self, text: &str) -> Vec<Reading> {
        if self.config.strip_non_printable {
            extract_readings(&sanitize_text(text))
        } else {
            extract_readings(text)
        }
    }
}
