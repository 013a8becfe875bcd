//! Excel report generation
//!
//! One worksheet per transmitter, laid out as:
//!
//! ```text
//! row 1       Transmitter Report <first> to <last>        (B1:J1, centered)
//! row 3       TX no <tx>  Serial No <serial>              (A3:J3)
//! rows 5-9    Probe 1 summary (A5:E9) | Probe 2 summary (F5:J9)
//! row 10      Data
//! row 11      column headers
//! row 12..    one row per reading
//! below       probe 1 chart, probe 2 chart (unless probe 2 is disabled)
//! ```
//!
//! Building is split in two: `plan_report` computes everything that ends up
//! on a sheet, `render_report` writes the plans with rust_xlsxwriter.

use asper_log_decoder::{group_by_transmitter, ProbeSummary, Reading, TransmitterGroup};
use rust_xlsxwriter::{
    Chart, ChartType, ColNum, Format, FormatAlign, RowNum, Workbook, Worksheet, XlsxError,
};
use std::collections::HashSet;

/// Longest sheet name the xlsx format accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

const TITLE_ROW: RowNum = 0;
const IDENTITY_ROW: RowNum = 2;
const SUMMARY_FIRST_ROW: RowNum = 4;
const SUMMARY_LAST_ROW: RowNum = 8;
const DATA_LABEL_ROW: RowNum = 9;
const HEADER_ROW: RowNum = 10;
const FIRST_DATA_ROW: RowNum = 11;

const FIRST_COL: ColNum = 0;
const LAST_COL: ColNum = 9;
const PROBE1_LAST_COL: ColNum = 4;
const PROBE2_FIRST_COL: ColNum = 5;

const PROBE1_TEMP_COL: ColNum = 1;
const PROBE2_TEMP_COL: ColNum = 5;
const TIMESTAMP_COL: ColNum = 9;

// chart anchors, counted from the last data row
const PROBE1_CHART_OFFSET: RowNum = 3;
const PROBE2_CHART_OFFSET: RowNum = 23;
// 10 cm
const CHART_HEIGHT_PX: u32 = 378;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Data table column headers, in reading field order
pub const DATA_HEADERS: [&str; 10] = [
    "Status",
    "Temp (°C)",
    "Probe1 Max",
    "Probe1 Min",
    "Probe1 Del",
    "Temp2 (°C)",
    "Probe2 Max",
    "Probe2 Min",
    "Probe2 Del",
    "Date/Time",
];

pub const PROBE2_DISABLED_TEXT: &str = "Probe 2 Disabled";

/// Errors raised while building a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no readings to report")]
    NoData,

    #[error("sheet name {0:?} is used by more than one transmitter")]
    DuplicateSheetName(String),

    #[error("Excel writer error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Everything written to one transmitter's worksheet
#[derive(Debug, Clone)]
pub struct SheetPlan {
    pub name: String,
    pub title: String,
    pub identity: String,
    pub probe1_text: String,
    pub probe2_text: String,
    /// Data table rows, time-ordered
    pub rows: Vec<Reading>,
    pub charts: Vec<ChartPlan>,
}

impl SheetPlan {
    fn from_group(group: &TransmitterGroup) -> Self {
        let first = group.first();
        let last = group.last();
        let probe2 = group.probe2_summary();

        let rows = group.readings().to_vec();
        let last_data_row = FIRST_DATA_ROW + rows.len() as RowNum - 1;

        let mut charts = vec![ChartPlan {
            title: "Probe 1 Temperature",
            series_name: "Probe 1 Temp",
            value_col: PROBE1_TEMP_COL,
            anchor_row: last_data_row + PROBE1_CHART_OFFSET,
        }];
        let probe2_text = if probe2.disabled {
            PROBE2_DISABLED_TEXT.to_string()
        } else {
            charts.push(ChartPlan {
                title: "Probe 2 Temperature",
                series_name: "Probe 2 Temp",
                value_col: PROBE2_TEMP_COL,
                anchor_row: last_data_row + PROBE2_CHART_OFFSET,
            });
            summary_text("Probe 2", probe2)
        };

        Self {
            name: sheet_name(group.transmitter()),
            title: format!(
                "Transmitter Report {} to {}",
                first.timestamp, last.timestamp
            ),
            identity: format!(
                "TX no {}  Serial No {}",
                group.transmitter(),
                first.serial_num
            ),
            probe1_text: summary_text("Probe 1", group.probe1_summary()),
            probe2_text,
            rows,
            charts,
        }
    }

    /// Zero-based row of the last data table entry
    pub fn last_data_row(&self) -> RowNum {
        FIRST_DATA_ROW + self.rows.len() as RowNum - 1
    }
}

/// A scatter chart of one probe column against time
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub title: &'static str,
    pub series_name: &'static str,
    pub value_col: ColNum,
    /// Zero-based row of the chart's top-left corner (column A)
    pub anchor_row: RowNum,
}

/// Build the complete workbook for a set of readings
pub fn build_report(readings: &[Reading]) -> Result<Vec<u8>, ReportError> {
    let plans = plan_report(readings)?;
    render_report(&plans)
}

/// Compute the sheet layouts, one per transmitter in ascending order
pub fn plan_report(readings: &[Reading]) -> Result<Vec<SheetPlan>, ReportError> {
    if readings.is_empty() {
        return Err(ReportError::NoData);
    }

    let mut names = HashSet::new();
    let mut plans = Vec::new();
    for group in group_by_transmitter(readings) {
        let plan = SheetPlan::from_group(&group);
        if !names.insert(plan.name.clone()) {
            return Err(ReportError::DuplicateSheetName(plan.name));
        }
        log::debug!("Planned sheet {} with {} rows", plan.name, plan.rows.len());
        plans.push(plan);
    }
    Ok(plans)
}

/// Write sheet plans into an in-memory xlsx document
pub fn render_report(plans: &[SheetPlan]) -> Result<Vec<u8>, ReportError> {
    if plans.is_empty() {
        return Err(ReportError::NoData);
    }

    let formats = Formats::new();
    let mut workbook = Workbook::new();
    for plan in plans {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, plan, &formats)?;
    }

    let bytes = workbook.save_to_buffer()?;
    log::info!("Report built: {} sheets, {} bytes", plans.len(), bytes.len());
    Ok(bytes)
}

struct Formats {
    title: Format,
    identity: Format,
    summary: Format,
    datetime: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            title: Format::new().set_align(FormatAlign::Center),
            identity: Format::new().set_align(FormatAlign::Left),
            summary: Format::new()
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::Top)
                .set_text_wrap(),
            datetime: Format::new().set_num_format(DATETIME_FORMAT),
        }
    }
}

fn write_sheet(worksheet: &mut Worksheet, plan: &SheetPlan, formats: &Formats) -> Result<(), ReportError> {
    worksheet.set_name(&plan.name)?;

    worksheet.merge_range(TITLE_ROW, FIRST_COL + 1, TITLE_ROW, LAST_COL, &plan.title, &formats.title)?;
    worksheet.merge_range(
        IDENTITY_ROW,
        FIRST_COL,
        IDENTITY_ROW,
        LAST_COL,
        &plan.identity,
        &formats.identity,
    )?;
    worksheet.merge_range(
        SUMMARY_FIRST_ROW,
        FIRST_COL,
        SUMMARY_LAST_ROW,
        PROBE1_LAST_COL,
        &plan.probe1_text,
        &formats.summary,
    )?;
    worksheet.merge_range(
        SUMMARY_FIRST_ROW,
        PROBE2_FIRST_COL,
        SUMMARY_LAST_ROW,
        LAST_COL,
        &plan.probe2_text,
        &formats.summary,
    )?;

    worksheet.write_string(DATA_LABEL_ROW, FIRST_COL, "Data")?;
    for (col, header) in DATA_HEADERS.iter().enumerate() {
        worksheet.write_string(HEADER_ROW, col as ColNum, *header)?;
    }

    for (index, reading) in plan.rows.iter().enumerate() {
        let row = FIRST_DATA_ROW + index as RowNum;
        worksheet.write_number(row, 0, reading.status)?;
        worksheet.write_number(row, 1, reading.probe1_temp)?;
        worksheet.write_number(row, 2, reading.probe1_max)?;
        worksheet.write_number(row, 3, reading.probe1_min)?;
        worksheet.write_number(row, 4, reading.probe1_delta)?;
        worksheet.write_number(row, 5, reading.probe2_temp)?;
        worksheet.write_number(row, 6, reading.probe2_max)?;
        worksheet.write_number(row, 7, reading.probe2_min)?;
        worksheet.write_number(row, 8, reading.probe2_delta)?;
        worksheet.write_number_with_format(
            row,
            TIMESTAMP_COL,
            excel_serial(reading),
            &formats.datetime,
        )?;
    }
    worksheet.set_column_width(TIMESTAMP_COL, 19)?;

    for chart_plan in &plan.charts {
        let chart = build_chart(&plan.name, plan.last_data_row(), chart_plan);
        worksheet.insert_chart(chart_plan.anchor_row, FIRST_COL, &chart)?;
    }

    Ok(())
}

fn build_chart(sheet: &str, last_data_row: RowNum, plan: &ChartPlan) -> Chart {
    let mut chart = Chart::new(ChartType::ScatterStraightWithMarkers);
    chart
        .add_series()
        .set_name(plan.series_name)
        .set_categories((sheet, FIRST_DATA_ROW, TIMESTAMP_COL, last_data_row, TIMESTAMP_COL))
        .set_values((sheet, FIRST_DATA_ROW, plan.value_col, last_data_row, plan.value_col));

    chart.title().set_name(plan.title);
    chart.x_axis().set_name("Time").set_hidden(true);
    chart.y_axis().set_name("Temp");
    chart.legend().set_hidden();
    chart.set_height(CHART_HEIGHT_PX);
    chart
}

/// Excel serial date-time (days since 1899-12-30)
fn excel_serial(reading: &Reading) -> f64 {
    reading.timestamp.and_utc().timestamp() as f64 / SECONDS_PER_DAY + UNIX_EPOCH_SERIAL
}

/// Sheet name for a transmitter: `TX_<n>`, restricted to `[A-Za-z0-9_-]`
pub fn sheet_name(transmitter: u8) -> String {
    safe_sheet_name(&format!("TX_{}", transmitter))
}

fn safe_sheet_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

fn summary_text(label: &str, summary: &ProbeSummary) -> String {
    format!(
        "{} \nMax temp {}\nMin temp {}\nAverage temp {}",
        label,
        format_value(summary.max),
        format_value(summary.min),
        format_value(summary.mean)
    )
}

/// Shortest decimal form, always with a fractional digit (`25.0`, `21.33`)
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
