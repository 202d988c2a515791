// Excel file import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: first worksheet into a Table, header on a fixed physical row.
// Export: the linked ledger as a styled Summary sheet plus an unstyled raw mirror.

use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook as XlsxWorkbook, Worksheet};
use stocklink_recon::config::OutputConfig;
use stocklink_recon::{CellValue, Table};

/// Excel's row limit (header included).
const MAX_ROWS: usize = 1_048_576;

/// Excel's column limit.
const MAX_COLS: usize = 16_384;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Import the first worksheet with its header on physical row `header_row` (1-based).
///
/// Rows are counted from row 1 of the sheet even when the used range starts
/// lower. Rows above the header are dropped, as are fully blank data rows.
pub fn import(path: &Path, header_row: usize, name: &str) -> Result<Table, String> {
    if header_row == 0 {
        return Err("header row is 1-based".to_string());
    }

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first, e))?;

    // Range start offset (data may not begin at A1)
    let (data_start_row, _) = range.start().unwrap_or((0, 0));
    let header_idx = header_row - 1;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (row_idx, row) in range.rows().enumerate() {
        let physical = data_start_row as usize + row_idx;
        if physical < header_idx {
            continue;
        }

        if physical == header_idx {
            headers = Some(row.iter().map(|c| cell_value(c).to_string()).collect());
            continue;
        }

        let values: Vec<CellValue> = row.iter().map(cell_value).collect();
        if values.iter().all(CellValue::is_blank) {
            continue;
        }
        rows.push(values);
    }

    let headers = headers.ok_or_else(|| {
        format!("Sheet '{}' has no header on row {}", first, header_row)
    })?;

    log::debug!(
        "{}: read {} rows from sheet '{}' (header row {})",
        path.display(),
        rows.len(),
        first,
        header_row
    );
    Ok(Table::from_rows(name, headers, rows))
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => {
            if s.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Store error as text representation
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => {
            // Assumes the 1900 date system (calamine does not expose the 1904 flag)
            let serial = dt.as_f64();
            match serial_to_datetime(serial) {
                Some(value) => CellValue::Date(value),
                None => CellValue::Number(serial),
            }
        }
        // ISO strings stay text
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

/// Excel serial (days since 1899-12-30) to a date-time, to the millisecond.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    excel_epoch()?.checked_add_signed(Duration::milliseconds(millis))
}

pub fn datetime_to_serial(value: &NaiveDateTime) -> Option<f64> {
    let delta = value.signed_duration_since(excel_epoch()?);
    Some(delta.num_milliseconds() as f64 / MILLIS_PER_DAY)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Sheet names and row geometry of the output workbook.
#[derive(Debug, Clone)]
pub struct WorkbookLayout {
    pub summary_sheet: String,
    pub raw_sheet: String,
    /// Summary header row height, in points.
    pub header_height: f64,
    /// Summary default row height, in points.
    pub default_row_height: f64,
}

impl Default for WorkbookLayout {
    fn default() -> Self {
        Self::from_config(&OutputConfig::default())
    }
}

impl WorkbookLayout {
    pub fn from_config(output: &OutputConfig) -> Self {
        Self {
            summary_sheet: output.summary_sheet.clone(),
            raw_sheet: output.raw_sheet.clone(),
            header_height: 75.0,
            default_row_height: 20.0,
        }
    }
}

/// Result of an Excel export operation
#[derive(Debug, Default)]
pub struct ExportResult {
    pub sheets_exported: usize,
    /// Data rows per sheet (header excluded)
    pub rows_exported: usize,
    /// Non-empty data cells across both sheets
    pub cells_exported: usize,
    pub export_duration_ms: u128,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "{} sheets, {} rows, {} cells in {}ms",
            self.sheets_exported, self.rows_exported, self.cells_exported, self.export_duration_ms
        )
    }
}

/// Serialize `table` into an in-memory xlsx workbook.
pub fn export_to_buffer(table: &Table, layout: &WorkbookLayout) -> Result<(Vec<u8>, ExportResult), String> {
    let start_time = Instant::now();
    let mut workbook = build_workbook(table, layout)?;
    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| format!("Failed to serialize XLSX workbook: {}", e))?;

    let mut result = export_result(table);
    result.export_duration_ms = start_time.elapsed().as_millis();
    Ok((bytes, result))
}

/// Write `table` to an xlsx file at `path`.
pub fn export(table: &Table, path: &Path, layout: &WorkbookLayout) -> Result<ExportResult, String> {
    let start_time = Instant::now();
    let mut workbook = build_workbook(table, layout)?;
    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    let mut result = export_result(table);
    result.export_duration_ms = start_time.elapsed().as_millis();
    Ok(result)
}

fn export_result(table: &Table) -> ExportResult {
    let cells = table
        .rows()
        .iter()
        .flatten()
        .filter(|v| !v.is_blank())
        .count();
    ExportResult {
        sheets_exported: 2,
        rows_exported: table.len(),
        cells_exported: cells * 2,
        export_duration_ms: 0,
    }
}

fn build_workbook(table: &Table, layout: &WorkbookLayout) -> Result<XlsxWorkbook, String> {
    if table.len() + 1 > MAX_ROWS {
        return Err(format!(
            "{} rows exceed Excel's limit of {} per sheet",
            table.len(),
            MAX_ROWS - 1
        ));
    }
    if table.headers().len() > MAX_COLS {
        return Err(format!("{} columns exceed Excel's limit of {}", table.headers().len(), MAX_COLS));
    }

    let mut workbook = XlsxWorkbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let summary = workbook
        .add_worksheet()
        .set_name(&layout.summary_sheet)
        .map_err(|e| format!("Failed to create sheet '{}': {}", layout.summary_sheet, e))?;
    write_summary_sheet(summary, table, layout, &date_format)?;

    let raw = workbook
        .add_worksheet()
        .set_name(&layout.raw_sheet)
        .map_err(|e| format!("Failed to create sheet '{}': {}", layout.raw_sheet, e))?;
    write_headers(raw, table, None)?;
    write_rows(raw, table, &date_format)?;

    Ok(workbook)
}

/// Bold 14pt header on a peach fill, centered and wrapped.
fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(14)
        .set_background_color(Color::RGB(0xFCE4D6))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

fn write_summary_sheet(
    worksheet: &mut Worksheet,
    table: &Table,
    layout: &WorkbookLayout,
    date_format: &Format,
) -> Result<(), String> {
    worksheet.set_default_row_height(layout.default_row_height);
    worksheet
        .set_row_height(0, layout.header_height)
        .map_err(|e| format!("Failed to set header height: {}", e))?;
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("Failed to set freeze panes: {}", e))?;

    if !table.headers().is_empty() {
        let last_col = (table.headers().len() - 1) as u16;
        worksheet
            .autofilter(0, 0, 0, last_col)
            .map_err(|e| format!("Failed to set autofilter: {}", e))?;
    }

    write_headers(worksheet, table, Some(&header_format()))?;
    write_rows(worksheet, table, date_format)
}

fn write_headers(worksheet: &mut Worksheet, table: &Table, format: Option<&Format>) -> Result<(), String> {
    for (col, header) in table.headers().iter().enumerate() {
        let col = col as u16;
        match format {
            Some(format) => worksheet.write_string_with_format(0, col, header, format),
            None => worksheet.write_string(0, col, header),
        }
        .map_err(|e| format!("Failed to write header '{}': {}", header, e))?;
    }
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, table: &Table, date_format: &Format) -> Result<(), String> {
    for (row_idx, row) in table.rows().iter().enumerate() {
        let xl_row = (row_idx + 1) as u32;
        for (col_idx, value) in row.iter().enumerate() {
            let xl_col = col_idx as u16;
            let written = match value {
                // NaN / inf and blanks are left empty
                _ if value.is_blank() => continue,
                CellValue::Text(s) => worksheet.write_string(xl_row, xl_col, s),
                CellValue::Number(n) => worksheet.write_number(xl_row, xl_col, *n),
                CellValue::Bool(b) => worksheet.write_boolean(xl_row, xl_col, *b),
                CellValue::Date(dt) => match datetime_to_serial(dt) {
                    Some(serial) => worksheet.write_number_with_format(xl_row, xl_col, serial, date_format),
                    None => worksheet.write_string(xl_row, xl_col, dt.to_string()),
                },
                CellValue::Empty => continue,
            };
            written.map_err(|e| {
                format!("Failed to write cell at row {}, column {}: {}", xl_row + 1, xl_col + 1, e)
            })?;
        }
    }
    Ok(())
}
