//! Input readers that turn a spreadsheet file into a [`RawTable`].
//!
//! - [`delimited`] — comma-separated text through the `csv` crate.
//! - [`workbook`] — Excel / OpenDocument workbooks through `calamine`.
//!
//! The format is chosen from the file extension by [`detect_format`].

use std::path::Path;

use anyhow::{bail, Result};

use crate::models::RawTable;

pub mod delimited;
pub mod workbook;

/// Reads one complete input sheet into memory.
pub trait SheetReader {
    fn read(&self, path: &Path) -> Result<RawTable>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Workbook,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Csv => write!(f, "CSV"),
            InputFormat::Workbook => write!(f, "workbook"),
        }
    }
}

/// Detect the input format from the file extension (case-insensitive).
pub fn detect_format(path: &Path) -> Option<InputFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(InputFormat::Csv),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(InputFormat::Workbook),
        _ => None,
    }
}

/// Read `path` with the reader matching its format.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let Some(format) = detect_format(path) else {
        bail!(
            "unsupported input file {} (expected .xlsx, .xls, .ods or .csv)",
            path.display()
        );
    };

    let table = match format {
        InputFormat::Csv => delimited::CsvReader::new().read(path)?,
        InputFormat::Workbook => workbook::WorkbookReader::new(sheet).read(path)?,
    };

    log::info!(
        "read {} rows with {} columns from {} {}",
        table.records.len(),
        table.headers.len(),
        format,
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("sales.xlsx")), Some(InputFormat::Workbook));
        assert_eq!(detect_format(Path::new("SALES.XLS")), Some(InputFormat::Workbook));
        assert_eq!(detect_format(Path::new("ledger.csv")), Some(InputFormat::Csv));
        assert_eq!(detect_format(Path::new("notes.txt")), None);
        assert_eq!(detect_format(Path::new("no_extension")), None);
    }

    #[test]
    fn test_unsupported_extension_is_error() {
        let err = read_table(Path::new("sales.txt"), None).unwrap_err();
        assert!(err.to_string().contains("unsupported input file"));
    }
}
