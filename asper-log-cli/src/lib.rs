//! Asper Temperature Report application layer
//!
//! Builds on the asper-log-decoder library and adds:
//! - Excel report generation (one sheet per transmitter, with charts)
//! - Request handling with caller-visible error tags
//! - TOML configuration
//! - Console preview of merged readings

pub mod config;
pub mod handler;
pub mod preview;
pub mod report;

pub use handler::{
    build_document, collect_readings, handle_archive, handle_data_file, Input, ReportDocument,
    RequestError, REPORT_FILE_NAME, REPORT_MIME_TYPE,
};
pub use report::{build_report, plan_report, render_report, ReportError, SheetPlan};
