// File I/O operations

use std::path::Path;

use stocklink_recon::config::HeaderConfig;
use stocklink_recon::{SourceKind, Table};

pub mod csv;
pub mod xlsx;

pub use xlsx::{ExportResult, WorkbookLayout};

/// Extensions read through calamine.
pub const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Extensions read as delimited text.
pub const DELIMITED_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// Load the first sheet of `path`, header on physical row `header_row` (1-based).
///
/// The format is picked from the file extension.
pub fn load_table(path: &Path, header_row: usize, name: &str) -> Result<Table, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if EXCEL_EXTENSIONS.contains(&ext.as_str()) {
        xlsx::import(path, header_row, name)
    } else if DELIMITED_EXTENSIONS.contains(&ext.as_str()) {
        csv::import(path, header_row, name)
    } else if ext.is_empty() {
        Err(format!("{}: no file extension", path.display()))
    } else {
        Err(format!("{}: unsupported file type '.{}'", path.display(), ext))
    }
}

/// Load one of the four exports using the header row configured for it.
pub fn load_source(path: &Path, kind: SourceKind, headers: &HeaderConfig) -> Result<Table, String> {
    let row = headers.row_for(kind);
    log::info!("loading {} from {} (header row {})", kind.label(), path.display(), row);
    load_table(path, row, kind.short_name())
}

/// Write the linked ledger to `path` as a two-sheet workbook.
pub fn write_output(table: &Table, path: &Path, layout: &WorkbookLayout) -> Result<ExportResult, String> {
    let result = xlsx::export(table, path, layout)?;
    log::info!("wrote {}: {}", path.display(), result.summary());
    Ok(result)
}
