use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single spreadsheet cell as read from the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Empty cells and whitespace-only text count as null.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Read the cell as a finite number, if it holds one.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Empty => return None,
        };
        n.is_finite().then_some(n)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            // Integral numbers render like identifiers ("1001", not "1001.0")
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s.trim()),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One input row, keyed by source column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub fields: BTreeMap<String, CellValue>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.fields.insert(column.into(), value);
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        RawRecord {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Every row of one input sheet, in file order, plus its header row.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    /// 1-based sheet row of the header; records follow directly below it.
    pub header_row: usize,
}

impl RawTable {
    /// Sheet row number of the record at `index`, as a spreadsheet shows it.
    pub fn sheet_row(&self, index: usize) -> usize {
        self.header_row + 1 + index
    }
}

impl Default for RawTable {
    fn default() -> Self {
        RawTable {
            headers: Vec::new(),
            records: Vec::new(),
            header_row: 1,
        }
    }
}

/// A cleaned sales line in the canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLine {
    pub item_id: String,
    pub quantity: f64,
    pub value: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::A, Tier::B, Tier::C];
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::A => write!(f, "A"),
            Tier::B => write!(f, "B"),
            Tier::C => write!(f, "C"),
        }
    }
}

/// One row of the ranked item table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAggregate {
    pub item_id: String,
    pub value: f64,
    pub perc: f64,
    pub cumu: f64,
    pub abc: Tier,
}

/// One row of the per-tier summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSummary {
    pub abc: Tier,
    pub item_count: usize,
    pub value_sum: f64,
    pub perc_sum: f64,
    pub item_perc: f64,
}

/// Full classifier output: ranked items, tier summary and the denominator used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcAnalysis {
    pub items: Vec<ItemAggregate>,
    pub summary: Vec<TierSummary>,
    pub grand_total: f64,
}

impl AbcAnalysis {
    pub fn items_in(&self, tier: Tier) -> impl Iterator<Item = &ItemAggregate> {
        self.items.iter().filter(move |i| i.abc == tier)
    }

    pub fn summary_for(&self, tier: Tier) -> Option<&TierSummary> {
        self.summary.iter().find(|s| s.abc == tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cells() {
        assert!(CellValue::Empty.is_null());
        assert!(CellValue::Text("   ".into()).is_null());
        assert!(!CellValue::Text("0".into()).is_null());
        assert!(!CellValue::Number(0.0).is_null());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Text(" 12.5 ".into()).as_number(), Some(12.5));
        assert_eq!(CellValue::Number(-3.0).as_number(), Some(-3.0));
        assert_eq!(CellValue::Text("twelve".into()).as_number(), None);
        assert_eq!(CellValue::Text("inf".into()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn test_sheet_row_follows_header() {
        let table = RawTable::default();
        assert_eq!(table.sheet_row(0), 2);

        let shifted = RawTable {
            header_row: 4,
            ..RawTable::default()
        };
        assert_eq!(shifted.sheet_row(0), 5);
        assert_eq!(shifted.sheet_row(3), 8);
    }

    #[test]
    fn test_integral_number_display() {
        assert_eq!(CellValue::Number(1001.0).to_string(), "1001");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Text(" SKU-1 ".into()).to_string(), "SKU-1");
    }
}
