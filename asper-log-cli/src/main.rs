//! Asper Temperature Report CLI
//!
//! Merges logger exports (ZIP archives and/or standalone files) and writes one
//! Excel workbook with a sheet per transmitter.

use anyhow::{Context, Result};
use asper_log_cli::config::{self, AppConfig, PreviewFormat};
use asper_log_cli::{build_document, collect_readings, preview};
use asper_log_decoder::Decoder;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Asper Temperature Report - merge logger exports into an Excel report
#[derive(Parser, Debug)]
#[command(name = "asper-log-cli")]
#[command(about = "Merge temperature logger exports into an Excel report", long_about = None)]
#[command(version)]
struct Args {
    /// ZIP archive of logger exports (can be repeated)
    #[arg(short, long, value_name = "FILE")]
    archive: Vec<PathBuf>,

    /// Standalone logger export file (can be repeated)
    #[arg(short, long, value_name = "FILE")]
    file: Vec<PathBuf>,

    /// Output workbook (default: merged_temperature_data.xlsx)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the first N merged readings
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Print the preview as JSON lines
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Asper Temperature Report v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using decoder library v{}", asper_log_decoder::VERSION);

    let settings = resolve_settings(&args)?;
    let inputs = settings.inputs();
    if inputs.is_empty() {
        println!("Asper Temperature Report - No input specified");
        println!("\nQuick Start:");
        println!("  asper-log-cli --archive exports.zip");
        println!("  asper-log-cli --file logger_export.txt -o report.xlsx");
        println!("\nOr list inputs in a config file:");
        println!("  asper-log-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    }

    let decoder = Decoder::with_config(settings.decoder.clone());
    let readings = collect_readings(&decoder, &inputs).map_err(|e| {
        log::debug!("{}", e);
        anyhow::anyhow!(e.user_message())
    })?;

    let document = build_document(&readings).map_err(|e| {
        log::debug!("{}", e);
        anyhow::anyhow!(e.user_message())
    })?;

    if !args.quiet {
        println!("Parsed {} readings.", document.reading_count);
    }

    if settings.output.preview_rows > 0 && !args.quiet {
        let stdout = std::io::stdout();
        preview::write_preview(
            &mut stdout.lock(),
            &readings,
            settings.output.preview_rows,
            settings.output.preview_format,
        )
        .context("Failed to print preview")?;
    }

    let output = settings.output_path();
    fs::write(&output, &document.bytes)
        .with_context(|| format!("Failed to write report: {:?}", output))?;

    if !args.quiet {
        println!("Report written to {:?}", output);
    }
    Ok(())
}

/// Merge the optional config file with command line flags (flags win)
fn resolve_settings(args: &Args) -> Result<AppConfig> {
    let mut settings = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    settings.input.archives.extend(args.archive.iter().cloned());
    settings.input.files.extend(args.file.iter().cloned());
    if let Some(output) = &args.output {
        settings.output.path = Some(output.clone());
    }
    if let Some(rows) = args.preview {
        settings.output.preview_rows = rows;
    }
    if args.json {
        settings.output.preview_format = PreviewFormat::Json;
    }

    log::debug!("Inputs: {:?}", settings.inputs());
    Ok(settings)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use asper_log_cli::Input;

    #[test]
    fn test_flags_extend_and_override() {
        let args = Args::parse_from([
            "asper-log-cli",
            "-a",
            "one.zip",
            "--archive",
            "two.zip",
            "-f",
            "loose.txt",
            "-o",
            "out.xlsx",
            "--preview",
            "20",
            "--json",
        ]);
        let settings = resolve_settings(&args).unwrap();

        assert_eq!(
            settings.inputs(),
            vec![
                Input::Archive(PathBuf::from("one.zip")),
                Input::Archive(PathBuf::from("two.zip")),
                Input::DataFile(PathBuf::from("loose.txt")),
            ]
        );
        assert_eq!(settings.output_path(), PathBuf::from("out.xlsx"));
        assert_eq!(settings.output.preview_rows, 20);
        assert_eq!(settings.output.preview_format, PreviewFormat::Json);
    }

    #[test]
    fn test_no_flags_defaults() {
        let args = Args::parse_from(["asper-log-cli"]);
        let settings = resolve_settings(&args).unwrap();
        assert!(settings.inputs().is_empty());
        assert_eq!(
            settings.output_path(),
            PathBuf::from("merged_temperature_data.xlsx")
        );
    }
}
