use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use crate::classify::Thresholds;
use crate::models::{AbcAnalysis, Tier};

type Rgb3 = (f32, f32, f32);

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const T_END: f32 = PAGE_W - MARGIN;
const BAND_H: f32 = 58.0;

const INK: Rgb3 = (0.07, 0.08, 0.14);
const INK_SOFT: Rgb3 = (0.36, 0.40, 0.52);
const INK_FAINT: Rgb3 = (0.58, 0.63, 0.72);
const RULE: Rgb3 = (0.85, 0.87, 0.92);
const STRIPE: Rgb3 = (0.95, 0.96, 0.99);
const BAND: Rgb3 = (0.16, 0.24, 0.42);
const BAND_TEXT: Rgb3 = (1.00, 1.00, 1.00);

//  RANK   ITEM        VALUE      PERC       CUMU       TIER
const ITEM_COL_X: [f32; 6] = [
    MARGIN,
    MARGIN + 14.0,
    MARGIN + 78.0,
    MARGIN + 108.0,
    MARGIN + 130.0,
    MARGIN + 154.0,
];

/// Render a PDF report: cover page → tier summary with Pareto chart → ranked item table.
pub fn render(
    analysis: &AbcAnalysis,
    input: &Path,
    thresholds: &Thresholds,
    output_path: &Path,
) -> Result<()> {
    let input_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("input");

    let doc = PdfDocument::empty("ABC Analysis Report");
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let fonts = Fonts { regular: &font_r, bold: &font_b };

    add_cover_page(&doc, analysis, input_name, &fonts);
    add_summary_page(&doc, analysis, thresholds, &fonts);
    add_item_pages(&doc, analysis, &fonts);

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

struct Fonts<'a> {
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
}

/// Light background and strong foreground for a tier.
fn tier_colors(tier: Tier) -> (Rgb3, Rgb3) {
    match tier {
        Tier::A => ((0.90, 0.98, 0.92), (0.07, 0.52, 0.22)),
        Tier::B => ((1.00, 0.95, 0.87), (0.70, 0.40, 0.02)),
        Tier::C => ((1.00, 0.91, 0.91), (0.76, 0.09, 0.13)),
    }
}

fn add_cover_page(doc: &PdfDocumentReference, analysis: &AbcAnalysis, input_name: &str, fonts: &Fonts<'_>) {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let band_bot = PAGE_H - BAND_H;
    rect(&layer, 0.0, band_bot, PAGE_W, BAND_H, BAND, PaintMode::Fill);
    set_color(&layer, BAND_TEXT);
    layer.use_text("ABC Analysis", 28.0, Mm(MARGIN), Mm(PAGE_H - 28.0), fonts.bold);
    layer.use_text(
        format!("Input: {}", truncate(input_name, 48)),
        10.0, Mm(MARGIN), Mm(band_bot + 12.0), fonts.regular,
    );

    let mut y = band_bot - 16.0;
    set_color(&layer, INK);
    layer.use_text(
        format!("{} distinct items", analysis.items.len()),
        12.0, Mm(MARGIN), Mm(y), fonts.bold,
    );
    set_color(&layer, INK_SOFT);
    layer.use_text(
        format!("Grand total value {:.2}", analysis.grand_total),
        10.0, Mm(MARGIN), Mm(y - 6.5), fonts.regular,
    );
    y -= 14.0;
    hline(&layer, MARGIN, T_END, y, RULE);

    // One card per tier: item count, then value share and item share
    let gap = 5.0;
    let card_w = (T_END - MARGIN - gap * 2.0) / 3.0;
    let card_h = 34.0;
    let card_y = y - 8.0 - card_h;
    for (i, tier) in Tier::ALL.iter().enumerate() {
        let (bg, fg) = tier_colors(*tier);
        let x = MARGIN + (card_w + gap) * i as f32;
        let row = analysis.summary_for(*tier);

        rect(&layer, x, card_y, card_w, card_h, bg, PaintMode::Fill);
        rect(&layer, x, card_y + card_h - 2.0, card_w, 2.0, fg, PaintMode::Fill);

        set_color(&layer, fg);
        layer.use_text(format!("TIER {}", tier), 7.0, Mm(x + 4.0), Mm(card_y + card_h - 8.0), fonts.bold);
        layer.use_text(
            row.map_or(0, |r| r.item_count).to_string(),
            22.0, Mm(x + 4.0), Mm(card_y + 12.0), fonts.bold,
        );
        set_color(&layer, INK_SOFT);
        layer.use_text(
            format!(
                "{:.1}% of value, {:.1}% of items",
                row.map_or(0.0, |r| r.perc_sum),
                row.map_or(0.0, |r| r.item_perc)
            ),
            7.0, Mm(x + 4.0), Mm(card_y + 4.0), fonts.regular,
        );
    }

    draw_footer(&layer, fonts.regular);
}

fn add_summary_page(
    doc: &PdfDocumentReference,
    analysis: &AbcAnalysis,
    thresholds: &Thresholds,
    fonts: &Fonts<'_>,
) {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Summary");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    rect(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, BAND, PaintMode::Fill);
    set_color(&layer, INK);
    layer.use_text("Tier Summary", 20.0, Mm(MARGIN), Mm(278.5), fonts.bold);
    set_color(&layer, INK_SOFT);
    layer.use_text(
        format!(
            "A below {}% cumulative value share, B below {}%, C the remainder",
            thresholds.a(),
            thresholds.a() + thresholds.b()
        ),
        9.0, Mm(MARGIN), Mm(271.5), fonts.regular,
    );
    hline(&layer, MARGIN, T_END, 267.5, RULE);

    const TABLE_TOP: f32 = 258.0;
    const HDR_H: f32 = 9.0;
    const ROW_H: f32 = 10.0;
    let col_x = [MARGIN + 4.0, MARGIN + 36.0, MARGIN + 72.0, MARGIN + 112.0, MARGIN + 144.0];
    let headers = ["abc", "item_count", "value_sum", "perc_sum", "item_perc"];

    let table_h = HDR_H + ROW_H * analysis.summary.len() as f32;
    let table_bot = TABLE_TOP - table_h;
    rect(&layer, MARGIN, table_bot, T_END - MARGIN, table_h, RULE, PaintMode::Stroke);

    set_color(&layer, INK_SOFT);
    for (x, h) in col_x.iter().zip(headers) {
        layer.use_text(h, 7.0, Mm(*x), Mm(TABLE_TOP - 6.2), fonts.bold);
    }
    hline(&layer, MARGIN, T_END, TABLE_TOP - HDR_H, RULE);

    let mut y_top = TABLE_TOP - HDR_H;
    for row in &analysis.summary {
        let y_bot = y_top - ROW_H;
        let (bg, fg) = tier_colors(row.abc);
        rect(&layer, MARGIN, y_bot, 3.0, ROW_H, fg, PaintMode::Fill);
        rect(&layer, MARGIN + 3.0, y_bot, T_END - MARGIN - 3.0, ROW_H, bg, PaintMode::Fill);

        let text_y = y_bot + 3.6;
        set_color(&layer, fg);
        layer.use_text(row.abc.to_string(), 9.0, Mm(col_x[0] + 2.0), Mm(text_y), fonts.bold);
        set_color(&layer, INK);
        layer.use_text(row.item_count.to_string(), 8.5, Mm(col_x[1]), Mm(text_y), fonts.regular);
        layer.use_text(format!("{:.2}", row.value_sum), 8.5, Mm(col_x[2]), Mm(text_y), fonts.regular);
        layer.use_text(format!("{:.2}%", row.perc_sum), 8.5, Mm(col_x[3]), Mm(text_y), fonts.regular);
        layer.use_text(format!("{:.2}%", row.item_perc), 8.5, Mm(col_x[4]), Mm(text_y), fonts.regular);
        y_top = y_bot;
    }

    let chart_top = table_bot - 16.0;
    set_color(&layer, INK_FAINT);
    layer.use_text("PARETO DISTRIBUTION", 6.5, Mm(MARGIN), Mm(chart_top), fonts.bold);
    let plot = PlotArea {
        x: MARGIN,
        y: 40.0,
        w: T_END - MARGIN,
        h: chart_top - 48.0,
    };
    draw_pareto_chart(&layer, analysis, thresholds, &plot, fonts.regular);

    draw_footer(&layer, fonts.regular);
}

struct PlotArea {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

/// Cumulative share per ranked item as bars coloured by tier, with threshold guides.
fn draw_pareto_chart(
    layer: &PdfLayerReference,
    analysis: &AbcAnalysis,
    thresholds: &Thresholds,
    area: &PlotArea,
    font: &IndirectFontRef,
) {
    let plot_x = area.x + 10.0;
    let plot_w = area.w - 10.0;
    let scale = |pct: f64| area.y + (pct.clamp(0.0, 100.0) as f32 / 100.0) * area.h;

    set_color(layer, INK_FAINT);
    for pct in [0.0, 50.0, 100.0] {
        layer.use_text(format!("{}%", pct), 6.0, Mm(area.x), Mm(scale(pct) - 1.0), font);
    }

    let slot = plot_w / analysis.items.len().max(1) as f32;
    let bar_w = (slot * 0.8).max(0.2);
    for (i, item) in analysis.items.iter().enumerate() {
        let (_, fg) = tier_colors(item.abc);
        let top = scale(item.cumu);
        rect(layer, plot_x + i as f32 * slot, area.y, bar_w, top - area.y, fg, PaintMode::Fill);
    }

    for cut in [thresholds.a(), thresholds.a() + thresholds.b()] {
        hline(layer, plot_x, area.x + area.w, scale(cut), INK_FAINT);
    }
    hline(layer, plot_x, area.x + area.w, area.y, INK_SOFT);
}

fn add_item_pages(doc: &PdfDocumentReference, analysis: &AbcAnalysis, fonts: &Fonts<'_>) {
    const ROW_H: f32 = 7.0;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;

    let mut cur_y = FIRST_Y;
    let mut page: Option<(PdfPageIndex, PdfLayerIndex)> = None;
    let mut page_num: u32 = 0;

    for (rank, item) in analysis.items.iter().enumerate() {
        let (pi, li) = match page {
            Some(current) if cur_y - ROW_H >= BOT_MARGIN => current,
            _ => {
                page_num += 1;
                cur_y = FIRST_Y;
                start_item_page(doc, page_num, fonts)
            }
        };
        page = Some((pi, li));
        let layer = doc.get_page(pi).get_layer(li);

        let row_bot = cur_y - ROW_H + 1.5;
        if rank % 2 == 0 {
            rect(&layer, MARGIN, row_bot, T_END - MARGIN, ROW_H, STRIPE, PaintMode::Fill);
        }

        let text_y = cur_y - 4.0;
        let cells = [
            ((rank + 1).to_string(), INK_FAINT),
            (truncate(&item.item_id, 36), INK),
            (format!("{:.2}", item.value), INK_SOFT),
            (format!("{:.2}%", item.perc), INK_SOFT),
            (format!("{:.2}%", item.cumu), INK_SOFT),
        ];
        for ((text, color), x) in cells.into_iter().zip(ITEM_COL_X) {
            set_color(&layer, color);
            layer.use_text(text, 8.0, Mm(x + 1.5), Mm(text_y), fonts.regular);
        }

        let (bg, fg) = tier_colors(item.abc);
        let badge_x = ITEM_COL_X[5] + 1.5;
        rect(&layer, badge_x, row_bot + 0.7, 12.0, 4.8, bg, PaintMode::Fill);
        set_color(&layer, fg);
        layer.use_text(item.abc.to_string(), 7.0, Mm(badge_x + 4.5), Mm(row_bot + 1.8), fonts.bold);

        hline(&layer, MARGIN, T_END, row_bot, RULE);
        cur_y -= ROW_H;
    }
}

fn start_item_page(doc: &PdfDocumentReference, page_num: u32, fonts: &Fonts<'_>) -> (PdfPageIndex, PdfLayerIndex) {
    const HDR_Y: f32 = 268.5;
    let headers = ["#", "item_id", "value", "perc", "cumu", "abc"];

    let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Items");
    let layer = doc.get_page(pi).get_layer(li);

    rect(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, BAND, PaintMode::Fill);
    set_color(&layer, INK);
    layer.use_text("Items Ranked by Value", 14.0, Mm(MARGIN), Mm(282.5), fonts.bold);
    set_color(&layer, INK_FAINT);
    layer.use_text(format!("Page {}", page_num), 8.0, Mm(T_END - 14.0), Mm(283.0), fonts.regular);
    hline(&layer, MARGIN, T_END, 277.5, RULE);

    rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, RULE, PaintMode::Stroke);
    set_color(&layer, INK_SOFT);
    for (h, x) in headers.iter().zip(ITEM_COL_X) {
        layer.use_text(*h, 7.0, Mm(x + 1.5), Mm(HDR_Y - 4.0), fonts.bold);
    }

    draw_footer(&layer, fonts.regular);
    (pi, li)
}

fn draw_footer(layer: &PdfLayerReference, font: &IndirectFontRef) {
    hline(layer, MARGIN, T_END, 22.0, RULE);
    set_color(layer, INK_FAINT);
    layer.use_text(
        format!("Generated by abc-analyzer v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font,
    );
}

fn rgb((r, g, b): Rgb3) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: Rgb3) {
    layer.set_fill_color(rgb(color));
}

/// Axis-aligned rectangle, filled or outlined; resets the pen to black.
fn rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb3, mode: PaintMode) {
    match mode {
        PaintMode::Stroke => {
            layer.set_outline_color(rgb(color));
            layer.set_outline_thickness(0.4);
        }
        _ => layer.set_fill_color(rgb(color)),
    }
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ]],
        mode,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max - 1).collect();
        format!("{}…", kept)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::CanonicalLine;
    use tempfile::TempDir;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_render_writes_pdf() {
        let lines: Vec<CanonicalLine> = (1..=90)
            .map(|i| CanonicalLine {
                item_id: format!("SKU-{:03}", i),
                quantity: 1.0,
                value: i as f64,
                description: None,
            })
            .collect();
        let analysis = classify(&lines, &Thresholds::default()).unwrap();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.pdf");
        render(&analysis, Path::new("sales.xlsx"), &Thresholds::default(), &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
