use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::models::{CellValue, RawRecord, RawTable};

/// Reader for Excel and OpenDocument workbooks.
///
/// Reads the first worksheet unless a sheet name is given. The first row of the
/// used range is the header row.
pub struct WorkbookReader<'a> {
    sheet: Option<&'a str>,
}

impl<'a> WorkbookReader<'a> {
    pub fn new(sheet: Option<&'a str>) -> Self {
        Self { sheet }
    }
}

impl super::SheetReader for WorkbookReader<'_> {
    fn read(&self, path: &Path) -> Result<RawTable> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("failed to open workbook {}", path.display()))?;

        let names = workbook.sheet_names();
        let index = match self.sheet {
            Some(name) => names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| {
                    anyhow!(
                        "worksheet '{}' not found in {} (available: {})",
                        name,
                        path.display(),
                        names.join(", ")
                    )
                })?,
            None => 0,
        };

        let range = workbook
            .worksheet_range_at(index)
            .ok_or_else(|| anyhow!("{} contains no worksheets", path.display()))?
            .with_context(|| format!("failed to read worksheet in {}", path.display()))?;

        // the used range starts at the first non-empty row, not necessarily row 1
        let header_row = range.start().map_or(1, |(row, _)| row as usize + 1);

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(first) => first.iter().map(|c| c.to_string().trim().to_string()).collect(),
            None => return Ok(RawTable::default()),
        };

        let records = rows
            .map(|row| {
                let mut raw = RawRecord::default();
                for (col, header) in headers.iter().enumerate() {
                    if raw.get(header).is_some() {
                        continue;
                    }
                    let cell = row.get(col).map(to_cell).unwrap_or(CellValue::Empty);
                    raw.insert(header.clone(), cell);
                }
                raw
            })
            .collect();

        Ok(RawTable {
            headers,
            records,
            header_row,
        })
    }
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        // spreadsheet errors (#N/A, #DIV/0!) read as missing, like blank cells
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnMapping;
    use crate::error::AnalysisError;
    use crate::ingest::SheetReader;
    use crate::normalize::normalize;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_fixture(path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet().set_name("Sales").unwrap();
        sheet.write_string(0, 0, "ProductName").unwrap();
        sheet.write_string(0, 1, "qty").unwrap();
        sheet.write_string(0, 2, "LINeSales").unwrap();
        sheet.write_string(1, 0, "Widget").unwrap();
        sheet.write_number(1, 1, 4).unwrap();
        sheet.write_number(1, 2, 120.5).unwrap();
        sheet.write_number(2, 0, 1001).unwrap();
        sheet.write_number(2, 2, 30).unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_read_first_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.xlsx");
        write_fixture(&path);

        let table = WorkbookReader::new(None).read(&path).unwrap();
        assert_eq!(table.headers, vec!["ProductName", "qty", "LINeSales"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].get("LINeSales"), Some(&CellValue::Number(120.5)));
        assert_eq!(table.records[1].get("qty"), Some(&CellValue::Empty));
        assert_eq!(
            table.records[1].get("ProductName").map(|c| c.to_string()),
            Some("1001".to_string())
        );
    }

    #[test]
    fn test_named_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.xlsx");
        write_fixture(&path);

        assert!(WorkbookReader::new(Some("Sales")).read(&path).is_ok());
        let err = WorkbookReader::new(Some("Missing")).read(&path).unwrap_err();
        assert!(err.to_string().contains("worksheet 'Missing' not found"));
    }

    #[test]
    fn test_header_below_blank_rows_keeps_sheet_numbering() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        // header on sheet row 3, first data row on sheet row 4
        sheet.write_string(2, 0, "item_id").unwrap();
        sheet.write_string(2, 1, "qty").unwrap();
        sheet.write_string(2, 2, "value").unwrap();
        sheet.write_string(3, 0, "Widget").unwrap();
        sheet.write_number(3, 1, 1).unwrap();
        sheet.write_string(3, 2, "n/a").unwrap();
        workbook.save(&path).unwrap();

        let table = WorkbookReader::new(None).read(&path).unwrap();
        assert_eq!(table.header_row, 3);
        assert_eq!(table.headers, vec!["item_id", "qty", "value"]);
        assert_eq!(table.sheet_row(0), 4);

        let mapping = ColumnMapping {
            description: None,
            ..ColumnMapping::default()
        };
        let err = normalize(&table, &mapping).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidNumber {
                row: 4,
                column: "value".into(),
                raw: "n/a".into()
            }
        );
    }
}
