//! Asper Temperature Log Decoder Library
//!
//! A stateless library for decoding the fixed-width export files written by
//! Asper temperature loggers, either one file at a time or in bulk from a ZIP
//! archive.
//!
//! # Architecture
//!
//! - `record`: decodes one fixed-width record line into a [`Reading`]
//! - `section`: finds the `<Data>` block of an export and feeds its lines to the record decoder
//! - `archive`: merges the readings of every `.txt` entry of a ZIP archive
//! - `table`: orders readings, groups them per transmitter and computes probe statistics
//!
//! The library does NOT render reports. Spreadsheet generation lives in the
//! application layer (asper-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use asper_log_decoder::{group_by_transmitter, Decoder};
//!
//! let bytes = std::fs::read("exports.zip").unwrap();
//! let readings = Decoder::new().decode_archive(&bytes).unwrap();
//!
//! for group in group_by_transmitter(&readings) {
//!     let probe1 = group.probe1_summary();
//!     println!(
//!         "TX {}: {} readings, mean {}",
//!         group.transmitter(),
//!         group.len(),
//!         probe1.mean
//!     );
//! }
//! ```

// Public modules
pub mod archive;
pub mod config;
pub mod decoder;
pub mod record;
pub mod section;
pub mod table;
pub mod types;

// Re-export main types for convenience
pub use archive::{aggregate, aggregate_with_config};
pub use config::DecoderConfig;
pub use decoder::Decoder;
pub use record::{decode_line, parse_line};
pub use section::{extract_section, extract_section_strict, sanitize_text};
pub use table::{group_by_transmitter, sort_readings, ProbeSummary, TransmitterGroup};
pub use types::{DecoderError, Reading, RecordError, Result, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a decoder with default settings reads .txt entries
        let decoder = Decoder::new();
        assert!(decoder.config().should_decode_entry("export.txt"));
        assert!(!VERSION.is_empty());
    }
}
