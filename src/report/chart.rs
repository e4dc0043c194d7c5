use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::prelude::*;

use crate::classify::Thresholds;
use crate::models::{AbcAnalysis, Tier};

const SIZE: (u32, u32) = (1400, 640);
const PARETO_WIDTH: i32 = 900;

/// Render the Pareto chart and the tier distribution side by side into a PNG.
pub fn render(analysis: &AbcAnalysis, thresholds: &Thresholds, path: &Path) -> Result<()> {
    draw(analysis, thresholds, path)
        .map_err(|e| anyhow!("failed to draw chart {}: {}", path.display(), e))?;
    println!("Chart written to: {}", path.display());
    Ok(())
}

fn draw(
    analysis: &AbcAnalysis,
    thresholds: &Thresholds,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(PARETO_WIDTH);

    // Pareto distribution: cumulative share per ranked item
    let n = analysis.items.len() as f64;
    let mut pareto = ChartBuilder::on(&left)
        .caption("Pareto Distribution", ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(0f64..n.max(1.0), 0f64..105f64)?;

    pareto
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("items ranked by value")
        .y_desc("cumulative share (%)")
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()?;

    pareto.draw_series(analysis.items.iter().enumerate().map(|(i, item)| {
        let x = i as f64;
        Rectangle::new(
            [(x + 0.1, 0.0), (x + 0.9, item.cumu.clamp(0.0, 100.0))],
            tier_color(item.abc).filled(),
        )
    }))?;

    for cut in [thresholds.a(), thresholds.a() + thresholds.b()] {
        pareto.draw_series(LineSeries::new(
            vec![(0.0, cut), (n.max(1.0), cut)],
            BLACK.mix(0.4).stroke_width(1),
        ))?;
    }

    // Tier distribution by number of items
    let mut dist = ChartBuilder::on(&right)
        .caption("Items per Tier", ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(-0.5f64..2.5f64, 0f64..100f64)?;

    dist.configure_mesh()
        .disable_x_mesh()
        .x_labels(3)
        .x_label_formatter(&|x| match x.round() as i64 {
            0 => "A".to_string(),
            1 => "B".to_string(),
            2 => "C".to_string(),
            _ => String::new(),
        })
        .y_desc("share of items (%)")
        .draw()?;

    dist.draw_series(tier_item_shares(analysis).into_iter().enumerate().map(
        |(i, (tier, share))| {
            let x = i as f64;
            Rectangle::new([(x - 0.3, 0.0), (x + 0.3, share)], tier_color(tier).filled())
        },
    ))?;

    root.present()?;
    Ok(())
}

/// Item share per tier, A to C, with zero for tiers that have no items.
fn tier_item_shares(analysis: &AbcAnalysis) -> Vec<(Tier, f64)> {
    Tier::ALL
        .iter()
        .map(|&tier| (tier, analysis.summary_for(tier).map_or(0.0, |s| s.item_perc)))
        .collect()
}

fn tier_color(tier: Tier) -> RGBColor {
    match tier {
        Tier::A => RGBColor(18, 133, 56),
        Tier::B => RGBColor(179, 102, 5),
        Tier::C => RGBColor(194, 23, 33),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::CanonicalLine;

    #[test]
    fn test_tier_item_shares_include_empty_tiers() {
        let lines = vec![
            CanonicalLine { item_id: "x".into(), quantity: 1.0, value: 800.0, description: None },
            CanonicalLine { item_id: "y".into(), quantity: 1.0, value: 150.0, description: None },
            CanonicalLine { item_id: "z".into(), quantity: 1.0, value: 50.0, description: None },
        ];
        let analysis = classify(&lines, &Thresholds::default()).unwrap();
        let shares = tier_item_shares(&analysis);

        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0], (Tier::A, 0.0));
        assert_eq!(shares[1].0, Tier::B);
        assert!((shares[1].1 - 100.0 / 3.0).abs() < 1e-9);
        assert!((shares[2].1 - 200.0 / 3.0).abs() < 1e-9);
    }
}
