use std::path::PathBuf;

use clap::Parser;

use crate::models::Tier;

#[derive(Parser, Debug)]
#[command(
    name = "abc-analyzer",
    about = "Classify sales-ledger items into A/B/C value tiers",
    version
)]
pub struct Cli {
    /// Sales ledger to analyze (.xlsx, .xls, .ods or .csv)
    pub input: PathBuf,

    /// Config file [default: <input dir>/.abc-analyzer/config.toml, fallback ~/.config/abc-analyzer/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Worksheet to read from a workbook [default: first sheet]
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Source column holding the item identifier
    #[arg(long, value_name = "COLUMN")]
    pub item_col: Option<String>,

    /// Source column holding the quantity
    #[arg(long, value_name = "COLUMN")]
    pub qty_col: Option<String>,

    /// Source column holding the line value
    #[arg(long, value_name = "COLUMN")]
    pub value_col: Option<String>,

    /// Source column holding the line description (used for ordering only)
    #[arg(long, value_name = "COLUMN")]
    pub desc_col: Option<String>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to abc-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "abc-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Export the item and summary tables to a workbook; defaults to abc_analysis.xlsx
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "abc_analysis.xlsx")]
    pub export: Option<PathBuf>,

    /// Write the Pareto and tier distribution charts to a PNG; defaults to abc-chart.png
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "abc-chart.png")]
    pub chart: Option<PathBuf>,

    /// Print the item table of a tier (repeatable)
    #[arg(long, value_name = "TIER")]
    pub tier: Vec<TierArg>,

    /// Print the first rows of the input before analysis
    #[arg(long)]
    pub preview: bool,

    /// Show every tier's items and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum TierArg {
    A,
    B,
    C,
}

impl From<&TierArg> for Tier {
    fn from(arg: &TierArg) -> Self {
        match arg {
            TierArg::A => Tier::A,
            TierArg::B => Tier::B,
            TierArg::C => Tier::C,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_with_optional_values() {
        let cli = Cli::parse_from(["abc-analyzer", "sales.xlsx", "--export", "--pdf", "out.pdf"]);
        assert_eq!(cli.export, Some(PathBuf::from("abc_analysis.xlsx")));
        assert_eq!(cli.pdf, Some(PathBuf::from("out.pdf")));
        assert!(cli.chart.is_none());
        assert!(matches!(cli.report, ReportFormat::Terminal));
    }

    #[test]
    fn test_repeatable_tier_and_columns() {
        let cli = Cli::parse_from([
            "abc-analyzer",
            "ledger.csv",
            "--tier",
            "a",
            "--tier",
            "c",
            "--value-col",
            "LINeSales",
        ]);
        let tiers: Vec<Tier> = cli.tier.iter().map(Into::into).collect();
        assert_eq!(tiers, vec![Tier::A, Tier::C]);
        assert_eq!(cli.value_col.as_deref(), Some("LINeSales"));
    }
}
