//! Spreadsheet export of the item and summary tables.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::models::AbcAnalysis;

pub const ITEM_SHEET: &str = "ABC Table";
pub const SUMMARY_SHEET: &str = "Summary";

const ITEM_COLUMNS: [&str; 5] = ["item_id", "value", "perc", "cumu", "abc"];
const SUMMARY_COLUMNS: [&str; 5] = ["abc", "item_count", "value_sum", "perc_sum", "item_perc"];

/// Write both tables to an `.xlsx` file at `path`.
pub fn save(analysis: &AbcAnalysis, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(analysis)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to write workbook to {}", path.display()))?;
    log::info!("exported {} items to {}", analysis.items.len(), path.display());
    Ok(())
}

fn build_workbook(analysis: &AbcAnalysis) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let items = workbook.add_worksheet().set_name(ITEM_SHEET)?;
    write_header(items, &ITEM_COLUMNS, &header)?;
    for (i, item) in analysis.items.iter().enumerate() {
        let row = i as u32 + 1;
        items.write_string(row, 0, &item.item_id)?;
        items.write_number(row, 1, item.value)?;
        items.write_number(row, 2, item.perc)?;
        items.write_number(row, 3, item.cumu)?;
        items.write_string(row, 4, item.abc.to_string())?;
    }

    let summary = workbook.add_worksheet().set_name(SUMMARY_SHEET)?;
    write_header(summary, &SUMMARY_COLUMNS, &header)?;
    for (i, tier) in analysis.summary.iter().enumerate() {
        let row = i as u32 + 1;
        summary.write_string(row, 0, tier.abc.to_string())?;
        summary.write_number(row, 1, tier.item_count as f64)?;
        summary.write_number(row, 2, tier.value_sum)?;
        summary.write_number(row, 3, tier.perc_sum)?;
        summary.write_number(row, 4, tier.item_perc)?;
    }

    Ok(workbook)
}

fn write_header(sheet: &mut Worksheet, columns: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Thresholds};
    use crate::models::CanonicalLine;
    use calamine::{open_workbook_auto, Data, Reader};
    use tempfile::TempDir;

    fn sample() -> AbcAnalysis {
        let lines: Vec<CanonicalLine> = [("x", 800.0), ("y", 150.0), ("z", 50.0)]
            .iter()
            .map(|(id, v)| CanonicalLine {
                item_id: id.to_string(),
                quantity: 1.0,
                value: *v,
                description: None,
            })
            .collect();
        classify(&lines, &Thresholds::default()).unwrap()
    }

    #[test]
    fn test_workbook_is_zip_container() {
        let mut workbook = build_workbook(&sample()).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_sheets_and_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abc_analysis.xlsx");
        save(&sample(), &path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec![ITEM_SHEET, SUMMARY_SHEET]);

        let items = workbook.worksheet_range_at(0).unwrap().unwrap();
        let header: Vec<String> = items.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, ITEM_COLUMNS);
        assert_eq!(items.height(), 4);
        let first = items.rows().nth(1).unwrap();
        assert_eq!(first[0], Data::String("x".into()));
        assert_eq!(first[4], Data::String("B".into()));
        let last = items.rows().nth(3).unwrap();
        assert_eq!(last[4], Data::String("C".into()));

        let summary = workbook.worksheet_range_at(1).unwrap().unwrap();
        let header: Vec<String> = summary.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, SUMMARY_COLUMNS);
        // tiers B and C only
        assert_eq!(summary.height(), 3);
        let b_row = summary.rows().nth(1).unwrap();
        assert_eq!(b_row[1], Data::Float(1.0));
        let c_row = summary.rows().nth(2).unwrap();
        assert_eq!(c_row[1], Data::Float(2.0));
    }
}
