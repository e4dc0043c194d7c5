use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::classify::Thresholds;
use crate::models::{AbcAnalysis, RawTable, Tier};

const PREVIEW_ROWS: usize = 5;

/// What the terminal report shows beyond the summary.
pub struct TerminalOptions<'a> {
    pub verbose: bool,
    pub quiet: bool,
    /// Tiers whose item tables are printed; empty means the default selection.
    pub tiers: &'a [Tier],
}

/// Render a colored terminal report.
pub fn render(
    analysis: &AbcAnalysis,
    input: &Path,
    thresholds: &Thresholds,
    opts: &TerminalOptions<'_>,
) -> Result<()> {
    let total = analysis.items.len();
    let count = |tier: Tier| analysis.summary_for(tier).map_or(0, |s| s.item_count);

    if opts.quiet {
        println!(
            "Items: {}  Total: {:.2}  A: {}  B: {}  C: {}",
            total,
            analysis.grand_total,
            count(Tier::A).to_string().green(),
            count(Tier::B).to_string().yellow(),
            count(Tier::C).to_string().red(),
        );
        return Ok(());
    }

    println!("\n {} v{}", "abc-analyzer".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Input: {}\n", input.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Distinct items     : {}", total));
    println!(" │  {:<48} │", format!("Grand total value  : {:.2}", analysis.grand_total));
    for tier in Tier::ALL {
        let share = analysis.summary_for(tier).map_or(0.0, |s| s.perc_sum);
        println!(
            " │  {:<48} │",
            format!(
                "{}  Tier {}          : {:>4}  ({:.1}% of value)",
                tier_marker(tier),
                tier,
                count(tier),
                share
            )
        );
    }
    println!(" └────────────────────────────────────────────────────┘");
    println!(
        " {}\n",
        format!(
            "A: cumulative share < {}%   B: < {}%   C: last {}%",
            thresholds.a(),
            thresholds.a() + thresholds.b(),
            thresholds.c()
        )
        .dimmed()
    );

    println!(" {} Tier summary:\n", "[ABC]".bold());
    render_summary_table(analysis);
    println!();

    for tier in tiers_to_show(opts) {
        let n = count(tier);
        if n == 0 {
            continue;
        }
        println!(
            " {} Category {} items ({}):\n",
            tier_label(tier),
            tier,
            n
        );
        render_item_table(analysis, tier);
        println!();
    }

    Ok(())
}

/// Print the first few raw rows exactly as they were read.
pub fn render_preview(table: &RawTable) {
    println!(" {} Raw data preview:\n", "[RAW]".cyan().bold());

    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            table
                .headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for record in table.records.iter().take(PREVIEW_ROWS) {
        out.add_row(
            table
                .headers
                .iter()
                .map(|h| Cell::new(record.get(h).map(|c| c.to_string()).unwrap_or_default())),
        );
    }

    println!("{}", out);
    if table.records.len() > PREVIEW_ROWS {
        println!(" … {} more rows", table.records.len() - PREVIEW_ROWS);
    }
    println!();
}

/// Explicit `--tier` wins; otherwise A only, or every tier with `--verbose`.
fn tiers_to_show(opts: &TerminalOptions<'_>) -> Vec<Tier> {
    if !opts.tiers.is_empty() {
        let mut tiers = opts.tiers.to_vec();
        tiers.sort();
        tiers.dedup();
        tiers
    } else if opts.verbose {
        Tier::ALL.to_vec()
    } else {
        vec![Tier::A]
    }
}

fn render_summary_table(analysis: &AbcAnalysis) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("abc").add_attribute(Attribute::Bold),
            Cell::new("item_count").add_attribute(Attribute::Bold),
            Cell::new("value_sum").add_attribute(Attribute::Bold),
            Cell::new("perc_sum").add_attribute(Attribute::Bold),
            Cell::new("item_perc").add_attribute(Attribute::Bold),
        ]);

    for row in &analysis.summary {
        table.add_row(vec![
            Cell::new(row.abc.to_string())
                .fg(tier_color(row.abc))
                .set_alignment(CellAlignment::Center),
            Cell::new(row.item_count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", row.value_sum)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}%", row.perc_sum)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}%", row.item_perc)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

fn render_item_table(analysis: &AbcAnalysis, tier: Tier) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("item_id").add_attribute(Attribute::Bold),
            Cell::new("value").add_attribute(Attribute::Bold),
            Cell::new("perc").add_attribute(Attribute::Bold),
            Cell::new("cumu").add_attribute(Attribute::Bold),
            Cell::new("abc").add_attribute(Attribute::Bold),
        ]);

    for item in analysis.items_in(tier) {
        table.add_row(vec![
            Cell::new(&item.item_id),
            Cell::new(format!("{:.2}", item.value)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}%", item.perc)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}%", item.cumu)).set_alignment(CellAlignment::Right),
            Cell::new(item.abc.to_string())
                .fg(tier_color(item.abc))
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::A => Color::Green,
        Tier::B => Color::Yellow,
        Tier::C => Color::Red,
    }
}

fn tier_marker(tier: Tier) -> ColoredString {
    match tier {
        Tier::A => "●".green(),
        Tier::B => "●".yellow(),
        Tier::C => "●".red(),
    }
}

fn tier_label(tier: Tier) -> ColoredString {
    match tier {
        Tier::A => "[A]".green().bold(),
        Tier::B => "[B]".yellow().bold(),
        Tier::C => "[C]".red().bold(),
    }
}
