// Archive → readings pipeline tests with archives built in memory
use asper_log_decoder::{
    aggregate, aggregate_with_config, group_by_transmitter, Decoder, DecoderConfig, DecoderError,
};
use chrono::NaiveDate;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn record(transmitter: &str, p1_temp: &str, p2_temp: &str, ts: &str) -> String {
    format!("00A1{transmitter}00{p1_temp}+0300+02000001{p2_temp}+0310+02100000{ts}")
}

fn export(lines: &[String]) -> String {
    format!(
        "<Header>\nLogger export\n</Header>\n<Data>\n$$ device echo\n{}\n</Data>\n",
        lines.join("\r\n")
    )
}

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn end_to_end_single_line() {
    init_logging();
    let line = record("01", "+0250", "+0260", "230615120000");
    let content = export(&[line]);
    let bytes = build_zip(&[("logger.txt", content.as_bytes())]);

    let readings = aggregate(&bytes).unwrap();
    assert_eq!(readings.len(), 1);

    let reading = &readings[0];
    assert_eq!(reading.transmitter, 1);
    assert_eq!(reading.probe1_temp, 25.0);
    assert_eq!(
        reading.timestamp,
        NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    );
}

#[test]
fn entries_merge_in_listing_order() {
    init_logging();
    let first = export(&[
        record("02", "+0100", "+0100", "230615120500"),
        record("02", "+0110", "+0100", "230615120000"),
    ]);
    let second = export(&[record("01", "+0200", "+0100", "230615110000")]);
    let bytes = build_zip(&[
        ("b_first.txt", first.as_bytes()),
        ("a_second.TXT", second.as_bytes()),
    ]);

    let readings = aggregate(&bytes).unwrap();
    let temps: Vec<f64> = readings.iter().map(|r| r.probe1_temp).collect();
    // no sorting during aggregation
    assert_eq!(temps, vec![10.0, 11.0, 20.0]);

    let groups = group_by_transmitter(&readings);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].transmitter(), 1);
    assert_eq!(groups[1].first().probe1_temp, 11.0);
}

#[test]
fn non_text_entries_and_directories_ignored() {
    init_logging();
    let content = export(&[record("03", "+0250", "+0260", "230615120000")]);
    let bytes = build_zip(&[
        ("exports/", &b""[..]),
        ("exports/readme.md", content.as_bytes()),
        ("exports/data.csv", content.as_bytes()),
        ("exports/logger.txt", content.as_bytes()),
    ]);

    let readings = aggregate(&bytes).unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].transmitter, 3);
}

#[test]
fn entry_without_section_contributes_nothing() {
    init_logging();
    let good = export(&[record("01", "+0250", "+0260", "230615120000")]);
    let bytes = build_zip(&[
        ("broken.txt", &b"no data markers in this file"[..]),
        ("good.txt", good.as_bytes()),
    ]);

    let readings = aggregate(&bytes).unwrap();
    assert_eq!(readings.len(), 1);
}

#[test]
fn invalid_utf8_is_ignored() {
    init_logging();
    let line = record("01", "+0250", "+0260", "230615120000");
    let mut content = b"<Data>\n\xff\xfe".to_vec();
    content.extend_from_slice(line.as_bytes());
    content.extend_from_slice(b"\n</Data>");
    let bytes = build_zip(&[("latin1.txt", content.as_slice())]);

    let readings = aggregate(&bytes).unwrap();
    assert_eq!(readings.len(), 1);
}

#[test]
fn archive_without_text_entries_is_empty() {
    init_logging();
    let bytes = build_zip(&[("image.png", &b"\x89PNG"[..])]);
    assert!(aggregate(&bytes).unwrap().is_empty());

    let bytes = build_zip(&[]);
    assert!(aggregate(&bytes).unwrap().is_empty());
}

#[test]
fn corrupt_archive_is_reported() {
    init_logging();
    let mut bytes = build_zip(&[("logger.txt", &b"<Data></Data>"[..])]);
    bytes.truncate(bytes.len() / 2);

    assert!(matches!(
        aggregate(&bytes),
        Err(DecoderError::InvalidArchive(_))
    ));
}

#[test]
fn custom_entry_extension() {
    init_logging();
    let content = export(&[record("01", "+0250", "+0260", "230615120000")]);
    let bytes = build_zip(&[
        ("logger.txt", content.as_bytes()),
        ("logger.LOG", content.as_bytes()),
    ]);

    let config = DecoderConfig::new().with_entry_extension("log");
    let readings = aggregate_with_config(&bytes, &config).unwrap();
    assert_eq!(readings.len(), 1);

    let readings = Decoder::with_config(config).decode_archive(&bytes).unwrap();
    assert_eq!(readings.len(), 1);
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for byte in data {
        crc ^= u32::from(*byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// One stored entry whose central directory claims a zip64 size of u64::MAX
fn zip_with_oversized_entry(name: &str, content: &[u8]) -> Vec<u8> {
    let crc = crc32(content);
    let len = content.len() as u32;
    let name_len = name.len() as u16;
    let mut out = Vec::new();

    // local file header
    out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0u16.to_le_bytes()); // stored
    out.extend_from_slice(&0u16.to_le_bytes()); // time
    out.extend_from_slice(&0x21u16.to_le_bytes()); // 1980-01-01
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(content);

    // central directory
    let central_start = out.len() as u32;
    out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0x21u16.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes()); // size lives in zip64 extra
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(&12u16.to_le_bytes()); // extra length
    out.extend_from_slice(&0u16.to_le_bytes()); // comment length
    out.extend_from_slice(&0u16.to_le_bytes()); // disk
    out.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
    out.extend_from_slice(&0u32.to_le_bytes()); // external attrs
    out.extend_from_slice(&0u32.to_le_bytes()); // local header offset
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&0x0001u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(&u64::MAX.to_le_bytes());
    let central_size = out.len() as u32 - central_start;

    // end of central directory
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&central_size.to_le_bytes());
    out.extend_from_slice(&central_start.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

#[test]
fn oversized_declared_entry_size_does_not_abort() {
    init_logging();
    let content = export(&[record("01", "+0250", "+0260", "230615120000")]);
    let bytes = zip_with_oversized_entry("a.txt", content.as_bytes());

    match aggregate(&bytes) {
        Ok(readings) => assert!(readings.len() <= 1),
        Err(e) => assert!(matches!(e, DecoderError::InvalidArchive(_))),
    }
}
