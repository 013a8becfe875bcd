//! Fixed-width record decoding
//!
//! Every data line written by the logger is a fixed-width ASCII record:
//!
//! ```text
//! SSSS TT ST ±PPPP ±MMMM ±mmmm DDDD ±PPPP ±MMMM ±mmmm DDDD YYMMDDhhmmss
//! ```
//!
//! (shown with spaces for readability; the real line has none). Temperatures
//! are stored in tenths of a degree behind an explicit sign character.
//!
//! Probe 2 is decoded with the sign characters of probe 1. The probe 2 sign
//! columns are present in the record but not applied; this matches the
//! reports the devices have always produced and is kept until confirmed.

use crate::types::{Reading, RecordError, Timestamp};
use chrono::{NaiveDateTime, Timelike};

/// Minimum trimmed line length for a record
pub const MIN_LINE_LEN: usize = 58;

const TIMESTAMP_FORMAT: &str = "%y%m%d%H%M%S";

// Field offsets (character columns)
const SERIAL: usize = 0;
const TRANSMITTER: usize = 4;
const STATUS: usize = 6;
const P1_SIGN: usize = 8;
const P1_TEMP: usize = 9;
const P1_MAX_SIGN: usize = 13;
const P1_MAX: usize = 14;
const P1_MIN_SIGN: usize = 18;
const P1_MIN: usize = 19;
const P1_DELTA: usize = 23;
const P2_TEMP: usize = 28;
const P2_MAX: usize = 33;
const P2_MIN: usize = 38;
const P2_DELTA: usize = 42;
const TIMESTAMP: usize = 46;

/// Decode one record line, or `None` if any field is malformed
///
/// Rejections are logged at trace level with the failing field.
pub fn decode_line(line: &str) -> Option<Reading> {
    match parse_line(line) {
        Ok(reading) => Some(reading),
        Err(e) => {
            log::trace!("Dropping line {:?}: {}", line, e);
            None
        }
    }
}

/// Decode one record line, reporting which field failed
pub fn parse_line(line: &str) -> Result<Reading, RecordError> {
    let chars: Vec<char> = line.trim().chars().collect();
    if chars.len() < MIN_LINE_LEN {
        return Err(RecordError::LineTooShort {
            len: chars.len(),
            min: MIN_LINE_LEN,
        });
    }
    let fields = Fields { chars: &chars };

    let p1_sign = fields.sign(P1_SIGN);
    let p1_max_sign = fields.sign(P1_MAX_SIGN);
    let p1_min_sign = fields.sign(P1_MIN_SIGN);

    Ok(Reading {
        serial_num: fields.hex_u16("serial", SERIAL)?,
        transmitter: fields.hex_u8("transmitter", TRANSMITTER)?,
        status: fields.hex_u8("status", STATUS)?,
        probe1_temp: fields.tenths("probe1_temp", P1_TEMP, p1_sign)?,
        probe1_max: fields.tenths("probe1_max", P1_MAX, p1_max_sign)?,
        probe1_min: fields.tenths("probe1_min", P1_MIN, p1_min_sign)?,
        probe1_delta: fields.unsigned("probe1_delta", P1_DELTA)?,
        probe2_temp: fields.tenths("probe2_temp", P2_TEMP, p1_sign)?,
        probe2_max: fields.tenths("probe2_max", P2_MAX, p1_max_sign)?,
        probe2_min: fields.tenths("probe2_min", P2_MIN, p1_min_sign)?,
        probe2_delta: fields.unsigned("probe2_delta", P2_DELTA)?,
        timestamp: fields.timestamp(TIMESTAMP)?,
    })
}

/// Column accessor over a trimmed record line
struct Fields<'a> {
    chars: &'a [char],
}

impl Fields<'_> {
    fn text(&self, offset: usize, width: usize) -> String {
        self.chars[offset..offset + width].iter().collect()
    }

    fn sign(&self, offset: usize) -> f64 {
        if self.chars[offset] == '-' {
            -1.0
        } else {
            1.0
        }
    }

    fn hex_u16(&self, field: &'static str, offset: usize) -> Result<u16, RecordError> {
        let raw = self.text(offset, 4);
        u16::from_str_radix(raw.trim(), 16).map_err(|_| RecordError::InvalidHex { field, value: raw })
    }

    fn hex_u8(&self, field: &'static str, offset: usize) -> Result<u8, RecordError> {
        let raw = self.text(offset, 2);
        u8::from_str_radix(raw.trim(), 16).map_err(|_| RecordError::InvalidHex { field, value: raw })
    }

    /// Signed value stored in tenths, scaled by an externally supplied sign
    fn tenths(&self, field: &'static str, offset: usize, sign: f64) -> Result<f64, RecordError> {
        let raw = self.text(offset, 4);
        let value: i32 = raw
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidNumber { field, value: raw })?;
        Ok(sign * f64::from(value) / 10.0)
    }

    fn unsigned(&self, field: &'static str, offset: usize) -> Result<u32, RecordError> {
        let raw = self.text(offset, 4);
        raw.trim()
            .parse()
            .map_err(|_| RecordError::InvalidNumber { field, value: raw })
    }

    fn timestamp(&self, offset: usize) -> Result<Timestamp, RecordError> {
        let raw = self.text(offset, 12);
        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(RecordError::InvalidTimestamp { value: raw });
        }
        match NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT) {
            // %S admits a leap second (60); the logger clock never writes one
            Ok(ts) if ts.nanosecond() < 1_000_000_000 => Ok(ts),
            _ => Err(RecordError::InvalidTimestamp { value: raw }),
        }
    }
}
