//! `abc-analyzer` — classify sales-ledger items into A/B/C value tiers.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load the column mapping ([`config::load_config`]) and apply CLI overrides.
//! 3. Read the input sheet into raw records ([`ingest::read_table`]).
//! 4. Clean and rename into canonical lines ([`normalize::normalize`]).
//! 5. Aggregate, rank, classify and summarize ([`classify::classify`]).
//! 6. Render the requested report ([`report`]), then the optional workbook
//!    export ([`export`]) and chart.
//! 7. Any failure is printed as one message and the process exits with `1`.

mod classify;
mod cli;
mod config;
mod error;
mod export;
mod ingest;
mod models;
mod normalize;
mod report;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use classify::{classify, Thresholds};
use cli::{Cli, ReportFormat};
use config::{load_config, ColumnOverrides};
use error::AnalysisError;
use models::Tier;
use normalize::normalize;
use report::terminal::TerminalOptions;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        report_failure(&err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let input_dir = cli
        .input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = load_config(&input_dir, cli.config.as_deref())?;
    let mapping = config.columns.with_overrides(&ColumnOverrides {
        item_id: cli.item_col.as_deref(),
        quantity: cli.qty_col.as_deref(),
        value: cli.value_col.as_deref(),
        description: cli.desc_col.as_deref(),
    });
    log::debug!("column mapping: {:?}", mapping);

    let table = {
        let spinner = (!cli.quiet).then(|| start_spinner(&cli.input)).transpose()?;
        let table = ingest::read_table(&cli.input, cli.sheet.as_deref());
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        table?
    };

    if cli.preview && !cli.quiet {
        report::terminal::render_preview(&table);
    }

    let thresholds = Thresholds::default();
    let lines = normalize(&table, &mapping)?;
    let analysis = classify(&lines, &thresholds)?;

    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report.clone(),
    };

    match report_format {
        ReportFormat::Terminal => {
            let tiers: Vec<Tier> = cli.tier.iter().map(Into::into).collect();
            report::terminal::render(
                &analysis,
                &cli.input,
                &thresholds,
                &TerminalOptions {
                    verbose: cli.verbose,
                    quiet: cli.quiet,
                    tiers: &tiers,
                },
            )?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        ReportFormat::Pdf => {
            let pdf_path = cli
                .pdf
                .clone()
                .unwrap_or_else(|| PathBuf::from("abc-report.pdf"));
            report::pdf::render(&analysis, &cli.input, &thresholds, &pdf_path)?;
        }
    }

    if let Some(path) = &cli.export {
        export::save(&analysis, path)?;
        if !cli.quiet {
            eprintln!("  {} tables exported to {}", "→".cyan(), path.display());
        }
    }

    if let Some(path) = &cli.chart {
        report::chart::render(&analysis, &thresholds, path)?;
    }

    Ok(())
}

fn start_spinner(input: &Path) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("reading {}", input.display()));
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

/// Single human-readable failure message, with a hint for analysis errors.
fn report_failure(err: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), err);
    if let Some(analysis_err) = err.downcast_ref::<AnalysisError>() {
        eprintln!("  {} {}", "hint:".cyan(), analysis_err.hint());
    }
}
