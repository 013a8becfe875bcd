//! Core types for the temperature log decoder library
//!
//! This module defines the decoded reading emitted for every valid record line
//! and the error types returned by the decoding entry points.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Timestamp type used throughout the decoder (logger local time, no zone)
pub type Timestamp = NaiveDateTime;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// One decoded record from a temperature logger data section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Device serial number (4 hex digits)
    pub serial_num: u16,
    /// Transmitter number (2 hex digits), the report grouping key
    pub transmitter: u8,
    /// Status byte, passed through untouched
    pub status: u8,
    /// Probe 1 current temperature in °C
    pub probe1_temp: f64,
    /// Probe 1 maximum since last reset
    pub probe1_max: f64,
    /// Probe 1 minimum since last reset
    pub probe1_min: f64,
    /// Probe 1 delta counter
    pub probe1_delta: u32,
    /// Probe 2 current temperature in °C
    pub probe2_temp: f64,
    /// Probe 2 maximum since last reset
    pub probe2_max: f64,
    /// Probe 2 minimum since last reset
    pub probe2_min: f64,
    /// Probe 2 delta counter
    pub probe2_delta: u32,
    /// Time the record was logged
    pub timestamp: Timestamp,
}

/// Errors that can occur while decoding files and archives
///
/// Per-line failures never show up here; malformed lines are dropped by the
/// record decoder. These are the conditions a caller has to report.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Not a valid ZIP archive: {0}")]
    InvalidArchive(String),

    #[error("No <Data> section found")]
    MissingDataSection,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Reason a single record line was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("line has {len} characters, at least {min} required")]
    LineTooShort { len: usize, min: usize },

    #[error("field '{field}' is not hexadecimal: {value:?}")]
    InvalidHex { field: &'static str, value: String },

    #[error("field '{field}' is not a decimal integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("timestamp does not match YYMMDDhhmmss: {value:?}")]
    InvalidTimestamp { value: String },
}
