//! Cleaning and reshaping of raw ledger rows into [`CanonicalLine`]s.

use crate::config::ColumnMapping;
use crate::error::AnalysisError;
use crate::models::{CanonicalLine, CellValue, RawTable};

/// Convert raw records into canonical lines using the declared column mapping.
///
/// Every mapped column must appear in the header row, even when the table has
/// no data rows. Rows with a null quantity are dropped, as are rows without an
/// item identifier. The surviving lines are stable-sorted by description
/// ascending (lines without a description last); the order only affects
/// presentation.
pub fn normalize(
    table: &RawTable,
    mapping: &ColumnMapping,
) -> Result<Vec<CanonicalLine>, AnalysisError> {
    let description_col = mapping.description.as_deref().filter(|c| !c.is_empty());

    require_column(&table.headers, &mapping.item_id, "item_id")?;
    require_column(&table.headers, &mapping.quantity, "quantity")?;
    require_column(&table.headers, &mapping.value, "value")?;
    if let Some(col) = description_col {
        require_column(&table.headers, col, "description")?;
    }

    let mut lines = Vec::with_capacity(table.records.len());
    let mut dropped_qty = 0usize;

    for (idx, record) in table.records.iter().enumerate() {
        let row = table.sheet_row(idx);

        let quantity = match record.get(&mapping.quantity) {
            Some(cell) if !cell.is_null() => number(cell, row, &mapping.quantity)?,
            _ => {
                dropped_qty += 1;
                continue;
            }
        };

        let item_id = match record.get(&mapping.item_id) {
            Some(cell) if !cell.is_null() => cell.to_string(),
            _ => {
                log::warn!("row {}: no item identifier, line skipped", row);
                continue;
            }
        };

        // null values add nothing to an item's total
        let value = match record.get(&mapping.value) {
            Some(cell) if !cell.is_null() => number(cell, row, &mapping.value)?,
            _ => 0.0,
        };

        let description = description_col
            .and_then(|col| record.get(col))
            .filter(|cell| !cell.is_null())
            .map(|cell| cell.to_string());

        lines.push(CanonicalLine {
            item_id,
            quantity,
            value,
            description,
        });
    }

    if dropped_qty > 0 {
        log::debug!("dropped {} rows with no quantity", dropped_qty);
    }

    if description_col.is_some() {
        lines.sort_by(|a, b| match (&a.description, &b.description) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    Ok(lines)
}

fn require_column(
    headers: &[String],
    column: &str,
    role: &'static str,
) -> Result<(), AnalysisError> {
    if headers.iter().any(|h| h == column) {
        Ok(())
    } else {
        Err(AnalysisError::Schema {
            column: column.to_string(),
            role,
        })
    }
}

fn number(cell: &CellValue, row: usize, column: &str) -> Result<f64, AnalysisError> {
    cell.as_number().ok_or_else(|| AnalysisError::InvalidNumber {
        row,
        column: column.to_string(),
        raw: cell.to_string(),
    })
}
