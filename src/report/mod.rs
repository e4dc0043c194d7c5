//! Report renderers for ABC analysis results.
//!
//! - [`terminal`] — colored summary box, tier summary and per-tier item tables;
//!   respects `--verbose` / `--quiet` / `--tier`. Also renders the raw-row preview.
//! - [`pdf`] — cover page with one card per tier, tier summary with a Pareto chart,
//!   and the full ranked item table.
//! - [`chart`] — PNG with the Pareto distribution and the tier distribution by item count.

pub mod chart;
pub mod pdf;
pub mod terminal;
