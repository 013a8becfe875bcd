//! Request handling: input in, report document or tagged error out
//!
//! Each call is self-contained. Nothing is shared between requests.

use crate::report::{build_report, ReportError};
use asper_log_decoder::{Decoder, DecoderError, Reading};
use std::path::{Path, PathBuf};

/// Default download name of the generated report
pub const REPORT_FILE_NAME: &str = "merged_temperature_data.xlsx";

/// MIME type of the generated report
pub const REPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A finished report, ready to be stored or sent
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub bytes: Vec<u8>,
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub reading_count: usize,
}

/// Caller-visible failures
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("not a valid ZIP archive: {0}")]
    InvalidArchive(String),

    #[error("no valid temperature data found")]
    NoData,

    #[error("{path:?}: no <Data> section found")]
    MissingDataSection { path: PathBuf },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build report: {0}")]
    Report(ReportError),
}

impl RequestError {
    /// Message suitable for showing to the person who supplied the input
    pub fn user_message(&self) -> String {
        match self {
            RequestError::InvalidArchive(_) => "Uploaded file is not a valid ZIP archive.".to_string(),
            RequestError::NoData => "No valid temperature data found in ZIP.".to_string(),
            RequestError::MissingDataSection { path } => {
                format!("No <Data> section found in {}.", path.display())
            }
            RequestError::Io { path, source } => {
                format!("Could not read {}: {}", path.display(), source)
            }
            RequestError::Report(e) => format!("Could not build the Excel report: {}", e),
        }
    }

    fn from_decoder(err: DecoderError, path: &Path) -> Self {
        match err {
            DecoderError::InvalidArchive(reason) => RequestError::InvalidArchive(reason),
            DecoderError::MissingDataSection => RequestError::MissingDataSection {
                path: path.to_path_buf(),
            },
            DecoderError::IoError(source) => RequestError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

impl From<ReportError> for RequestError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NoData => RequestError::NoData,
            other => RequestError::Report(other),
        }
    }
}

/// One input to a report request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// ZIP archive of logger exports
    Archive(PathBuf),
    /// Standalone logger export
    DataFile(PathBuf),
}

/// Turn an uploaded archive into a report
pub fn handle_archive(archive_bytes: &[u8]) -> Result<ReportDocument, RequestError> {
    let readings = Decoder::new()
        .decode_archive(archive_bytes)
        .map_err(|e| RequestError::from_decoder(e, Path::new("<upload>")))?;
    build_document(&readings)
}

/// Turn a standalone export file into a report
pub fn handle_data_file(decoder: &Decoder, path: &Path) -> Result<ReportDocument, RequestError> {
    let readings = decoder
        .decode_file(path)
        .map_err(|e| RequestError::from_decoder(e, path))?;
    build_document(&readings)
}

/// Decode and merge all inputs, in the order given
pub fn collect_readings(decoder: &Decoder, inputs: &[Input]) -> Result<Vec<Reading>, RequestError> {
    let mut readings = Vec::new();
    for input in inputs {
        match input {
            Input::Archive(path) => {
                log::info!("Reading archive: {:?}", path);
                let bytes = std::fs::read(path).map_err(|source| RequestError::Io {
                    path: path.clone(),
                    source,
                })?;
                let decoded = decoder
                    .decode_archive(&bytes)
                    .map_err(|e| RequestError::from_decoder(e, path))?;
                readings.extend(decoded);
            }
            Input::DataFile(path) => {
                let decoded = decoder
                    .decode_file(path)
                    .map_err(|e| RequestError::from_decoder(e, path))?;
                readings.extend(decoded);
            }
        }
    }
    Ok(readings)
}

/// Build the report document; no readings means no document
pub fn build_document(readings: &[Reading]) -> Result<ReportDocument, RequestError> {
    if readings.is_empty() {
        return Err(RequestError::NoData);
    }

    Ok(ReportDocument {
        bytes: build_report(readings)?,
        file_name: REPORT_FILE_NAME,
        mime_type: REPORT_MIME_TYPE,
        reading_count: readings.len(),
    })
}
