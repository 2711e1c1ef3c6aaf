use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use crate::models::{RiskLabel, Verdict};
use crate::pipeline::Analysis;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 72.0;
const T_END: f32 = PAGE_W - MARGIN;

// ── Palette ───────────────────────────────────────────────────────────────────
const BG:           (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL_ALT:    (f32, f32, f32) = (0.95, 0.97, 0.96);
const PANEL_BORDER: (f32, f32, f32) = (0.85, 0.89, 0.88);
const ACCENT_GRN:   (f32, f32, f32) = (0.08, 0.55, 0.45); // teal
const ACCENT_BLU:   (f32, f32, f32) = (0.20, 0.46, 0.95);
const TEXT_PRI:     (f32, f32, f32) = (0.07, 0.08, 0.14);
const TEXT_SEC:     (f32, f32, f32) = (0.36, 0.40, 0.52);
const TEXT_MUT:     (f32, f32, f32) = (0.58, 0.63, 0.72);
const WHITE:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const WHITE_DIM:    (f32, f32, f32) = (0.85, 0.95, 0.93);

const LOW_BG:  (f32, f32, f32) = (0.90, 0.98, 0.92);
const LOW_FG:  (f32, f32, f32) = (0.07, 0.52, 0.22);
const MOD_BG:  (f32, f32, f32) = (1.00, 0.95, 0.87);
const MOD_FG:  (f32, f32, f32) = (0.70, 0.40, 0.02);
const HIGH_BG: (f32, f32, f32) = (1.00, 0.91, 0.91);
const HIGH_FG: (f32, f32, f32) = (0.76, 0.09, 0.13);

const R_BADGE: f32 = 1.5;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render a PDF report: cover page with risk counts and verdict, then the ingredient table.
pub fn render(analysis: &Analysis, output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Ingredient Safety Report");

    add_cover_page(&doc, analysis)?;
    add_table_pages(&doc, analysis)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    eprintln!("PDF report written to: {}", output_path.display());
    Ok(())
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(doc: &PdfDocumentReference, analysis: &Analysis) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let report = &analysis.report;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_GRN, ACCENT_BLU, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("chemcheck v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 30.0), Mm(PAGE_H - 10.5), &font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text("Ingredient Safety", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &font_b);

    // ── Verdict chip ──────────────────────────────────────────────────────────
    let (verdict_fg, verdict_bg, verdict_str) = match report.verdict {
        Verdict::Safe => (LOW_FG, LOW_BG, "PRODUCT APPEARS SAFE"),
        Verdict::Unsafe => (HIGH_FG, HIGH_BG, "HARMFUL INGREDIENTS DETECTED"),
    };
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 106.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, verdict_bg);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, verdict_fg);

    set_color(&layer, TEXT_MUT);
    layer.use_text("VERDICT", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), &font_b);
    set_color(&layer, verdict_fg);
    layer.use_text(verdict_str, 9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), &font_b);

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Keyword table  {}", analysis.keyword_version),
        9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r,
    );

    // ── Stat cards ────────────────────────────────────────────────────────────
    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, T_END, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    let card_y  = rule_y - 42.0;
    let card_h  = 26.0f32;
    let gap     = 4.0f32;
    let card_w  = (T_END - MARGIN - gap * 3.0) / 4.0;

    let cards: [(&str, String, (f32, f32, f32)); 4] = [
        ("INGREDIENTS", report.assessments.len().to_string(),         ACCENT_BLU),
        ("LOW",         report.count(RiskLabel::Low).to_string(),      LOW_FG),
        ("MODERATE",    report.count(RiskLabel::Moderate).to_string(), MOD_FG),
        ("HIGH",        report.count(RiskLabel::High).to_string(),     HIGH_FG),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent,
                       &font_r, &font_b);
    }

    // ── Harmful list ──────────────────────────────────────────────────────────
    let section_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, T_END, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("HARMFUL INGREDIENTS", 6.5, Mm(MARGIN), Mm(section_y - 7.5), &font_b);

    let harmful_lines = if report.harmful.is_empty() {
        vec!["None detected".to_string()]
    } else {
        wrap_text(&report.harmful.join(", "), 90)
    };
    set_color(&layer, TEXT_PRI);
    for (j, line) in harmful_lines.iter().take(12).enumerate() {
        let ly = section_y - 15.0 - j as f32 * 5.0;
        layer.use_text(line.as_str(), 9.0, Mm(MARGIN), Mm(ly), &font_r);
    }

    draw_hline(&layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by chemcheck v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), &font_r,
    );

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: (f32, f32, f32),
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), font_b);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

// ── Ingredient table ──────────────────────────────────────────────────────────

fn add_table_pages(doc: &PdfDocumentReference, analysis: &Analysis) -> Result<()> {
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    const ROW_H: f32 = 7.0;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;

    //  INGREDIENT   MATCHED    SCORE   FORMULA    RISK
    let col_x = [MARGIN, MARGIN + 66.0, MARGIN + 104.0, MARGIN + 118.0, MARGIN + 150.0];
    let headers = ["INGREDIENT", "MATCHED", "SCORE", "FORMULA", "RISK"];

    let mut cur_y = FIRST_Y;
    let mut page_state: Option<(PdfPageIndex, PdfLayerIndex)> = None;
    let mut page_num: u32 = 0;

    for (row_idx, a) in analysis.report.assessments.iter().enumerate() {
        let (pi, li) = match page_state {
            Some(state) if cur_y - ROW_H >= BOT_MARGIN => state,
            _ => {
                page_num += 1;
                let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Ingredients");
                let layer = doc.get_page(pi).get_layer(li);

                fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
                fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_GRN, ACCENT_BLU, 21);

                set_color(&layer, TEXT_PRI);
                layer.use_text("Ingredients", 14.0, Mm(MARGIN), Mm(282.5), &font_b);
                set_color(&layer, TEXT_MUT);
                layer.use_text(
                    format!("Page {}", page_num),
                    8.0, Mm(PAGE_W - MARGIN - 14.0), Mm(283.0), &font_r,
                );
                draw_hline(&layer, MARGIN, T_END, 277.5, PANEL_BORDER);

                fill_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL);
                stroke_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL_BORDER);
                set_color(&layer, TEXT_MUT);
                for (i, h) in headers.iter().enumerate() {
                    layer.use_text(*h, 7.0, Mm(col_x[i] + 1.5), Mm(HDR_Y - 4.0), &font_b);
                }

                draw_hline(&layer, MARGIN, T_END, 22.0, PANEL_BORDER);
                set_color(&layer, TEXT_MUT);
                layer.use_text(
                    format!("chemcheck v{}", env!("CARGO_PKG_VERSION")),
                    7.5, Mm(MARGIN), Mm(15.0), &font_r,
                );

                cur_y = FIRST_Y;
                page_state = Some((pi, li));
                (pi, li)
            }
        };
        let layer = doc.get_page(pi).get_layer(li);

        let (risk_str, risk_fg, risk_bg) = match a.risk_label {
            RiskLabel::Low      => ("LOW",      LOW_FG,  LOW_BG),
            RiskLabel::Moderate => ("MODERATE", MOD_FG,  MOD_BG),
            RiskLabel::High     => ("HIGH",     HIGH_FG, HIGH_BG),
        };

        if row_idx % 2 == 0 {
            fill_rect(&layer, MARGIN, cur_y - ROW_H + 1.5, T_END - MARGIN, ROW_H, PANEL_ALT);
        }

        let text_y = cur_y - 4.0;
        let formula = analysis
            .compounds
            .get(&a.ingredient)
            .and_then(|c| c.molecular_formula.as_deref())
            .unwrap_or("-");

        set_color(&layer, TEXT_PRI);
        layer.use_text(truncate(&a.ingredient, 38), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_r);
        set_color(&layer, TEXT_SEC);
        layer.use_text(
            truncate(a.matched_keyword.as_deref().unwrap_or("-"), 20),
            8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r,
        );
        layer.use_text(format!("{:.1}", a.toxicity_score), 8.0, Mm(col_x[2] + 1.5), Mm(text_y), &font_r);
        layer.use_text(truncate(formula, 16), 8.0, Mm(col_x[3] + 1.5), Mm(text_y), &font_r);

        let badge_x = col_x[4] + 1.5;
        let badge_y = cur_y - ROW_H + 2.2;
        fill_rounded_rect(&layer, badge_x, badge_y, 24.0, 4.8, R_BADGE, risk_bg);
        set_color(&layer, risk_fg);
        layer.use_text(risk_str, 7.0, Mm(badge_x + 3.0), Mm(badge_y + 1.1), &font_b);

        draw_hline(&layer, MARGIN, T_END, cur_y - ROW_H + 1.5, PANEL_BORDER);

        cur_y -= ROW_H;
    }

    Ok(())
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
             color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x),     Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x),     Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

/// Clockwise polygon approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));

    let corners = [
        (x + w - r, y + r,     270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32,   90.0f32),
        (x + r,     y + h - r, 90.0f32,  180.0f32),
        (x + r,     y + r,     180.0f32, 270.0f32),
    ];

    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let t = i as f32 / SEGS as f32;
            let angle = (start + (end - start) * t).to_radians();
            pts.push((
                Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())),
                false,
            ));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                     r: f32, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                       r: f32, color: (f32, f32, f32)) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32,
              color: (f32, f32, f32)) {
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

/// Left-to-right gradient drawn as `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: (f32, f32, f32),
    to: (f32, f32, f32),
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // strips overlap to hide rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::ingredient::classifier::classify;
    use crate::ingredient::keywords::KeywordTable;
    use crate::report::summary::aggregate;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("glycerin", 20), "glycerin");
        assert_eq!(truncate("methylparaben", 6), "methy…");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap_text("short", 40), vec!["short"]);
        assert!(wrap_text("", 10).is_empty());
    }

    #[test]
    fn test_render_writes_pdf() {
        let table = KeywordTable::default();
        let ingredients: Vec<String> = (0..60).map(|i| format!("ingredient paraben {i}")).collect();
        let assessments: Vec<_> = ingredients.iter().map(|n| classify(&table, n)).collect();
        let analysis = Analysis {
            keyword_version: table.version.clone(),
            ingredients,
            report: aggregate(&assessments),
            compounds: BTreeMap::new(),
        };

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");
        render(&analysis, &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
