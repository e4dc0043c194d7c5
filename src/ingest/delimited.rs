use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::models::{CellValue, RawRecord, RawTable};

/// Reader for comma-separated ledger exports.
///
/// The first line is the header row. Short rows are padded with empty cells so
/// every record carries every header column.
#[derive(Debug, Default)]
pub struct CsvReader;

impl CsvReader {
    pub fn new() -> Self {
        Self
    }
}

impl super::SheetReader for CsvReader {
    fn read(&self, path: &Path) -> Result<RawTable> {
        let file = File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        parse_csv(BufReader::new(file))
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}

fn parse_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header_record = rdr.headers()?;
    let header_row = header_record.position().map_or(1, |p| p.line() as usize);
    let headers: Vec<String> = header_record.iter().map(str::to_string).collect();
    let mut records = Vec::new();

    for (row_idx, result) in rdr.records().enumerate() {
        let row_num = header_row + 1 + row_idx;
        let record = result.with_context(|| format!("CSV parse error at line {}", row_num))?;

        let mut raw = RawRecord::default();
        for (col, header) in headers.iter().enumerate() {
            // first occurrence wins for duplicated header names
            if raw.get(header).is_some() {
                continue;
            }
            let cell = match record.get(col) {
                Some(s) if !s.is_empty() => CellValue::Text(s.to_string()),
                _ => CellValue::Empty,
            };
            raw.insert(header.clone(), cell);
        }
        records.push(raw);
    }

    Ok(RawTable {
        headers,
        records,
        header_row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::SheetReader;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_csv_rows() {
        let data = "item_id,qty,value,description\nA1,2,10.5,Widget\nB2,,4,Bolt\n";
        let table = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["item_id", "qty", "value", "description"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(
            table.records[0].get("value"),
            Some(&CellValue::Text("10.5".into()))
        );
        assert_eq!(table.records[1].get("qty"), Some(&CellValue::Empty));
        assert_eq!(table.header_row, 1);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = "item_id,qty,value\nA1,1\n";
        let table = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(table.records[0].get("value"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_header_only_file_is_empty_table() {
        let table = parse_csv("item_id,qty,value\n".as_bytes()).unwrap();
        assert_eq!(table.headers.len(), 3);
        assert!(table.records.is_empty());
    }

    #[test]
    fn test_read_from_path() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "sku,units,sales").unwrap();
        writeln!(f, "X, 3 , 9.99").unwrap();

        let table = CsvReader::new().read(f.path()).unwrap();
        assert_eq!(table.records[0].get("units"), Some(&CellValue::Text("3".into())));
        assert_eq!(table.records[0].get("sales"), Some(&CellValue::Text("9.99".into())));
    }
}
