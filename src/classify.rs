//! ABC classification of canonical lines.
//!
//! # Algorithm
//! 1. Sum `value` per item. Grouping yields items in ascending `item_id` order.
//! 2. Stable sort by summed value, descending. Equal values keep the grouping order.
//! 3. `perc = value / grand_total * 100`.
//! 4. `cumu` is the running sum of `perc`.
//! 5. Tier from `cumu`: A below `a`, B below `a + b`, C otherwise.
//! 6. Roll up one summary row per tier present.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::AnalysisError;
use crate::models::{AbcAnalysis, CanonicalLine, ItemAggregate, Tier, TierSummary};

const SUM_TOLERANCE: f64 = 1e-9;

/// Cumulative-share cut-offs, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    a: f64,
    b: f64,
    c: f64,
}

impl Thresholds {
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, AnalysisError> {
        let valid = [a, b, c].iter().all(|t| t.is_finite() && *t >= 0.0)
            && (a + b + c - 100.0).abs() < SUM_TOLERANCE;
        if valid {
            Ok(Thresholds { a, b, c })
        } else {
            Err(AnalysisError::InvalidThresholds { a, b, c })
        }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    /// Tier for a cumulative share. Both cut-offs are strict: `cumu == a` is B.
    pub fn tier_for(&self, cumu: f64) -> Tier {
        if cumu < self.a {
            Tier::A
        } else if cumu < self.a + self.b {
            Tier::B
        } else {
            Tier::C
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            a: 80.0,
            b: 15.0,
            c: 5.0,
        }
    }
}

/// Aggregate, rank and classify `lines`, then build the tier summary.
///
/// Fails with [`AnalysisError::DivisionByZero`] when the grand total is zero,
/// which includes an empty input, and with [`AnalysisError::NonFiniteTotal`]
/// when the sum overflows.
pub fn classify(
    lines: &[CanonicalLine],
    thresholds: &Thresholds,
) -> Result<AbcAnalysis, AnalysisError> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for line in lines {
        *totals.entry(line.item_id.as_str()).or_insert(0.0) += line.value;
    }

    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let grand_total: f64 = ranked.iter().map(|(_, v)| v).sum();
    if grand_total == 0.0 {
        return Err(AnalysisError::DivisionByZero);
    }
    if !grand_total.is_finite() {
        return Err(AnalysisError::NonFiniteTotal { total: grand_total });
    }

    log::debug!(
        "classifying {} items from {} lines, grand total {}",
        ranked.len(),
        lines.len(),
        grand_total
    );

    let mut cumu = 0.0;
    let items: Vec<ItemAggregate> = ranked
        .into_iter()
        .map(|(item_id, value)| {
            let perc = value / grand_total * 100.0;
            cumu += perc;
            ItemAggregate {
                item_id: item_id.to_string(),
                value,
                perc,
                cumu,
                abc: thresholds.tier_for(cumu),
            }
        })
        .collect();

    let summary = summarize(&items);

    Ok(AbcAnalysis {
        items,
        summary,
        grand_total,
    })
}

/// One row per tier present, ordered A, B, C.
fn summarize(items: &[ItemAggregate]) -> Vec<TierSummary> {
    let total_items = items.len();
    let mut rows: BTreeMap<Tier, TierSummary> = BTreeMap::new();

    for item in items {
        let row = rows.entry(item.abc).or_insert(TierSummary {
            abc: item.abc,
            item_count: 0,
            value_sum: 0.0,
            perc_sum: 0.0,
            item_perc: 0.0,
        });
        row.item_count += 1;
        row.value_sum += item.value;
        row.perc_sum += item.perc;
    }

    rows.into_values()
        .map(|mut row| {
            row.item_perc = row.item_count as f64 / total_items as f64 * 100.0;
            row
        })
        .collect()
}
