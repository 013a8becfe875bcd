//! Console preview of merged readings

use crate::config::PreviewFormat;
use crate::report::format_value;
use asper_log_decoder::Reading;
use std::io::{self, Write};

const TABLE_HEADER: [&str; 12] = [
    "Serial", "TX", "Status", "Temp", "P1 Max", "P1 Min", "P1 Del", "Temp2", "P2 Max", "P2 Min",
    "P2 Del", "Date/Time",
];
const COLUMN_WIDTH: usize = 8;

/// Write the first `rows` readings, in merge order
pub fn write_preview<W: Write>(
    out: &mut W,
    readings: &[Reading],
    rows: usize,
    format: PreviewFormat,
) -> io::Result<()> {
    let shown = &readings[..rows.min(readings.len())];
    match format {
        PreviewFormat::Table => write_table(out, shown)?,
        PreviewFormat::Json => {
            for reading in shown {
                serde_json::to_writer(&mut *out, reading)?;
                writeln!(out)?;
            }
        }
    }
    if shown.len() < readings.len() {
        writeln!(out, "... {} more readings", readings.len() - shown.len())?;
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, readings: &[Reading]) -> io::Result<()> {
    let header: Vec<String> = TABLE_HEADER
        .iter()
        .map(|h| format!("{:>width$}", h, width = COLUMN_WIDTH))
        .collect();
    writeln!(out, "{}", header.join(" "))?;

    for r in readings {
        let cells = [
            r.serial_num.to_string(),
            r.transmitter.to_string(),
            r.status.to_string(),
            format_value(r.probe1_temp),
            format_value(r.probe1_max),
            format_value(r.probe1_min),
            r.probe1_delta.to_string(),
            format_value(r.probe2_temp),
            format_value(r.probe2_max),
            format_value(r.probe2_min),
            r.probe2_delta.to_string(),
            r.timestamp.to_string(),
        ];
        let cells: Vec<String> = cells
            .iter()
            .map(|c| format!("{:>width$}", c, width = COLUMN_WIDTH))
            .collect();
        writeln!(out, "{}", cells.join(" "))?;
    }
    Ok(())
}
