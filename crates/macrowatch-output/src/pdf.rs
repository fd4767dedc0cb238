//! One-page A4 PDF rendering of the executive brief.
//!
//! Only the built-in Helvetica faces are used, so no font files are needed.
//! Offsets are measured from the top-left corner in centimetres. When a chart
//! PNG is supplied it is placed under the text, spanning the text width.

use crate::brief::ExecutiveBrief;
use crate::error::{ReportError, Result};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 20.0;
const CHART_TOP_CM: f32 = 12.5;
const CHART_WIDTH: f32 = PAGE_WIDTH - 2.0 * LEFT;

/// Title printed at the top of the page.
pub const TITLE: &str = "MACROECONOMIC RISK BRIEF (US)";

const FOOTER: &str =
    "Generated automatically by macrowatch (FRED macro series + composite index).";

fn pdf_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(e.to_string())
}

struct Page {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Page {
    fn text(&self, text: &str, size: f32, top_cm: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(text, size, Mm(LEFT), Mm(PAGE_HEIGHT - top_cm * 10.0), font);
    }
}

/// Text lines of the brief with their offset from the top (cm), size and
/// weight, in drawing order.
pub fn layout(brief: &ExecutiveBrief) -> Vec<(f32, f32, bool, String)> {
    let mut lines = vec![
        (2.0, 16.0, true, TITLE.to_string()),
        (3.0, 11.0, false, format!("Report Date: {}", brief.report_date)),
        (
            3.7,
            11.0,
            false,
            format!("Macro Stress Index: {:.2}", brief.macro_stress_index),
        ),
        (4.4, 11.0, false, format!("Stress Level: {}", brief.stress_level)),
        (
            5.1,
            11.0,
            false,
            format!("Historical Percentile: {}", brief.percentile_text()),
        ),
        (
            5.8,
            11.0,
            false,
            format!("3-Month Forecast Trend: {}", brief.trend_text()),
        ),
        (7.2, 12.0, true, "Regime-Based Strategy:".to_string()),
        (7.9, 11.0, false, format!("- {}", brief.strategy)),
        (
            9.2,
            12.0,
            true,
            "Historical Context (Top 3 Stress Months):".to_string(),
        ),
    ];

    if brief.top_periods.is_empty() {
        lines.push((9.9, 11.0, false, "- N/A".to_string()));
    } else {
        for (i, period) in brief.top_periods.iter().enumerate() {
            lines.push((
                9.9 + 0.6 * i as f32,
                11.0,
                false,
                format!("- {}", period.describe()),
            ));
        }
    }
    lines
}

/// Scale the PNG at `chart` to the text width and place it below the text.
fn embed_chart(layer: PdfLayerReference, chart: &Path) -> Result<()> {
    let decoded = printpdf::image_crate::open(chart)
        .map_err(|e| pdf_error(format!("{}: {}", chart.display(), e)))?;
    let (width_px, height_px) = (decoded.width() as f32, decoded.height() as f32);
    if width_px == 0.0 {
        return Err(pdf_error(format!("{}: empty image", chart.display())));
    }
    let height_mm = CHART_WIDTH * height_px / width_px;
    let transform = ImageTransform {
        translate_x: Some(Mm(LEFT)),
        translate_y: Some(Mm(PAGE_HEIGHT - CHART_TOP_CM * 10.0 - height_mm)),
        dpi: Some(width_px * 25.4 / CHART_WIDTH),
        ..ImageTransform::default()
    };
    Image::from_dynamic_image(&decoded).add_to_layer(layer, transform);
    debug!(path = %chart.display(), "embedded chart");
    Ok(())
}

impl ExecutiveBrief {
    /// Write the brief as a single A4 page to `path`, replacing any existing
    /// file. `chart`, when given, is a PNG drawn under the text.
    pub fn render_pdf(&self, path: &Path, chart: Option<&Path>) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let (doc, page, layer) =
            PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Brief");
        let page = Page {
            layer: doc.get_page(page).get_layer(layer),
            regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(pdf_error)?,
            italic: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(pdf_error)?,
        };

        for (top, size, bold, text) in layout(self) {
            let font = if bold { &page.bold } else { &page.regular };
            page.text(&text, size, top, font);
        }
        page.layer
            .use_text(FOOTER, 9.0, Mm(LEFT), Mm(14.0), &page.italic);
        if let Some(chart) = chart {
            embed_chart(page.layer.clone(), chart)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        doc.save(&mut writer).map_err(pdf_error)?;
        info!(path = %path.display(), "wrote executive brief PDF");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::StressPeriod;
    use crate::chart::{IndexPoint, render_index_chart};
    use chrono::{Months, NaiveDate};

    fn brief(top: Vec<StressPeriod>) -> ExecutiveBrief {
        ExecutiveBrief {
            report_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            macro_stress_index: 0.456,
            stress_level: "MODERATE".to_string(),
            percentile: 64.4,
            forecast_trend: None,
            forecast_delta: 0.0,
            strategy: "Rising stress: Rotate into Quality sectors".to_string(),
            top_periods: top,
        }
    }

    #[test]
    fn test_layout_lines() {
        let lines = layout(&brief(Vec::new()));
        let texts: Vec<&str> = lines.iter().map(|(_, _, _, t)| t.as_str()).collect();
        assert_eq!(texts[0], TITLE);
        assert!(texts.contains(&"Macro Stress Index: 0.46"));
        assert!(texts.contains(&"Historical Percentile: 64th (higher = more stress)"));
        assert!(texts.contains(&"3-Month Forecast Trend: N/A (delta +0.00)"));
        assert!(texts.contains(&"- Rising stress: Rotate into Quality sectors"));
        assert_eq!(texts.last(), Some(&"- N/A"));
    }

    #[test]
    fn test_layout_top_periods_step_down() {
        let period = |m: u32, v: f64| StressPeriod {
            date: NaiveDate::from_ymd_opt(1980, m, 1).unwrap(),
            macro_stress_index: v,
        };
        let lines = layout(&brief(vec![period(3, 6.5), period(4, 6.1)]));
        let tail = &lines[lines.len() - 2..];
        assert_eq!(tail[0].3, "- 1980-03-01 (Index 6.50)");
        assert!(tail[1].0 > tail[0].0);
    }

    #[test]
    fn test_render_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.pdf");
        brief(Vec::new()).render_pdf(&path, None).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_pdf_with_chart() {
        let dir = tempfile::tempdir().unwrap();
        let history: Vec<IndexPoint> = (0..36u32)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2020, 1, 1)
                    .unwrap()
                    .checked_add_months(Months::new(i))
                    .unwrap();
                (date, f64::from(i).sin())
            })
            .collect();
        let chart = dir.path().join("recent.png");
        render_index_chart(&chart, "US Macro Stress Index", &history, &[]).unwrap();

        let plain = dir.path().join("plain.pdf");
        let with_chart = dir.path().join("chart.pdf");
        brief(Vec::new()).render_pdf(&plain, None).unwrap();
        brief(Vec::new())
            .render_pdf(&with_chart, Some(&chart))
            .unwrap();

        let plain_len = std::fs::metadata(&plain).unwrap().len();
        let chart_len = std::fs::metadata(&with_chart).unwrap().len();
        assert!(chart_len > plain_len + 1000);
    }

    #[test]
    fn test_render_pdf_missing_chart() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            brief(Vec::new()).render_pdf(&dir.path().join("b.pdf"), Some(&dir.path().join("x.png")));
        assert!(matches!(result, Err(ReportError::Pdf(_))));
    }
}
