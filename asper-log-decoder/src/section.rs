//! `<Data>` section extraction
//!
//! Logger exports wrap their records in a `<Data>` ... `</Data>` block. Lines
//! starting with `$$` inside the block are device echo/comment lines.

use crate::record::decode_line;
use crate::types::{DecoderError, Reading, Result};

const DATA_OPEN: &str = "<Data>";
const DATA_CLOSE: &str = "</Data>";
const COMMENT_PREFIX: &str = "$$";

/// Text between the first `<Data>` and the next `</Data>`, if any
fn find_section(raw: &str) -> Option<&str> {
    let start = raw.find(DATA_OPEN)? + DATA_OPEN.len();
    let len = raw[start..].find(DATA_CLOSE)?;
    Some(&raw[start..start + len])
}

fn candidate_lines(section: &str) -> Vec<&str> {
    section
        .split(|c| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .collect()
}

/// Candidate record lines of the data section; empty when there is none
pub fn extract_section(raw: &str) -> Vec<&str> {
    find_section(raw).map(candidate_lines).unwrap_or_default()
}

/// Candidate record lines of the data section
///
/// Used for standalone files, where a missing section is an error.
pub fn extract_section_strict(raw: &str) -> Result<Vec<&str>> {
    find_section(raw)
        .map(candidate_lines)
        .ok_or(DecoderError::MissingDataSection)
}

/// Decode every valid record in the data section (archive entries)
pub fn extract_readings(raw: &str) -> Vec<Reading> {
    decode_lines(extract_section(raw))
}

/// Decode every valid record in the data section (standalone files)
pub fn extract_readings_strict(raw: &str) -> Result<Vec<Reading>> {
    Ok(decode_lines(extract_section_strict(raw)?))
}

fn decode_lines(lines: Vec<&str>) -> Vec<Reading> {
    let total = lines.len();
    let readings: Vec<Reading> = lines.into_iter().filter_map(decode_line).collect();
    if readings.len() < total {
        log::debug!("Dropped {} of {} data lines", total - readings.len(), total);
    }
    readings
}

/// Strip everything except printable ASCII, CR, LF and TAB
pub fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .filter(|&c| matches!(c, ' '..='~' | '\r' | '\n' | '\t'))
        .collect()
}
