//! ZIP archive aggregation
//!
//! Walks the entries of an uploaded archive in listing order and merges the
//! readings of every logger export it contains. Entry-level problems are
//! absorbed (the entry contributes nothing); only an unreadable container
//! fails the whole call.

use crate::config::DecoderConfig;
use crate::section::{extract_readings, sanitize_text};
use crate::types::{DecoderError, Reading, Result};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Upper bound on the buffer reserved up front for one entry
///
/// The declared size comes from the archive itself and is only a hint.
const ENTRY_CAPACITY_HINT: u64 = 16 * 1024 * 1024;

/// Decode all `.txt` entries of a ZIP archive with the default configuration
pub fn aggregate(archive_bytes: &[u8]) -> Result<Vec<Reading>> {
    aggregate_with_config(archive_bytes, &DecoderConfig::default())
}

/// Decode all matching entries of a ZIP archive
///
/// Readings are returned in archive listing order, then file order. No
/// sorting happens here.
pub fn aggregate_with_config(archive_bytes: &[u8], config: &DecoderConfig) -> Result<Vec<Reading>> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))
        .map_err(|e| DecoderError::InvalidArchive(e.to_string()))?;

    log::debug!("Archive opened with {} entries", archive.len());

    let mut readings = Vec::new();
    let mut decoded_entries = 0usize;

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping archive entry #{}: {}", index, e);
                continue;
            }
        };

        if entry.is_dir() || !config.should_decode_entry(entry.name()) {
            log::trace!("Ignoring archive entry {:?}", entry.name());
            continue;
        }

        let name = entry.name().to_string();
        let capacity = entry.size().min(ENTRY_CAPACITY_HINT) as usize;
        let mut bytes = Vec::with_capacity(capacity);
        if let Err(e) = entry.read_to_end(&mut bytes) {
            log::warn!("Skipping unreadable archive entry {:?}: {}", name, e);
            continue;
        }

        let mut text = decode_text_lossy(&bytes);
        if config.strip_non_printable {
            text = sanitize_text(&text);
        }

        let entry_readings = extract_readings(&text);
        log::debug!("{}: {} readings", name, entry_readings.len());

        decoded_entries += 1;
        readings.extend(entry_readings);
    }

    log::info!(
        "Decoded {} readings from {} archive entries",
        readings.len(),
        decoded_entries
    );
    Ok(readings)
}

/// Decode bytes as UTF-8, dropping invalid sequences
pub(crate) fn decode_text_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_lossy_drops_invalid_bytes() {
        let bytes = b"<Data>\xff\xfe ok\xc3</Data>";
        assert_eq!(decode_text_lossy(bytes), "<Data> ok</Data>");
    }

    #[test]
    fn test_not_a_zip() {
        let err = aggregate(b"definitely not a zip file").unwrap_err();
        assert!(matches!(err, DecoderError::InvalidArchive(_)));
    }

    #[test]
    fn test_empty_input_is_not_a_zip() {
        assert!(matches!(aggregate(&[]), Err(DecoderError::InvalidArchive(_))));
    }
}
