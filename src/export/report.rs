//! Paginated PDF report
//!
//! Layout is computed first as a plain list of drawing operations, then
//! rendered onto A4 pages. Splitting the two keeps pagination a pure
//! function of the input: given the same records and wrap width, page
//! boundaries never move.
//!
//! The vertical cursor runs top-down in millimetres. One title block,
//! an optional statistics block, one wrapped line per record advancing
//! 5 mm per line, a page break whenever the cursor passes 250 mm, and
//! the chart box after the last record line (or on a fresh page when
//! fewer than 97 mm remain).

use super::chart::ChartSnapshot;
use super::{format_file_size, ExportError, ExportResult};
use crate::history::HistoryRecord;
use crate::stats::AggregateStatistics;
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{BuiltinFont, ImageTransform, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

const MARGIN_X_MM: f32 = 14.0;
const TITLE_Y_MM: f32 = 20.0;
const TITLE_PT: f32 = 18.0;

const STATS_START_Y_MM: f32 = 35.0;
const STATS_STEP_MM: f32 = 8.0;
const STATS_PT: f32 = 12.0;

const RECORDS_START_Y_MM: f32 = 80.0;
const RECORD_PT: f32 = 10.0;
const LINE_STEP_MM: f32 = 5.0;
const PAGE_BREAK_Y_MM: f32 = 250.0;
const FRESH_PAGE_Y_MM: f32 = 20.0;

const CHART_FIT_LIMIT_Y_MM: f32 = 200.0;
const CHART_GAP_MM: f32 = 10.0;
const CHART_WIDTH_MM: f32 = 180.0;
const CHART_HEIGHT_MM: f32 = 100.0;
/// 900x500 px at this density lands exactly in the 180x100 mm box
const CHART_DPI: f32 = 127.0;

/// Characters that fit the 180 mm text column at 10 pt
const WRAP_COLUMNS: usize = 92;

const REPORT_TITLE: &str = "Image Compression History Report";

/// One drawing operation of the laid-out report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOp {
    /// Text at a top-down position on the current page
    Text {
        x: f32,
        y: f32,
        pt: f32,
        content: String,
    },

    /// Start a fresh page
    NewPage,

    /// Chart box with its top-left corner at a top-down position
    Chart { x: f32, y: f32 },
}

/// Deterministic report layout, ready to render
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub ops: Vec<ReportOp>,
    pub pages: usize,
}

/// Lay the report out without touching a file. Statistics are optional:
/// when the statistics fetch failed the block is omitted entirely and
/// the record list still starts at its fixed position.
pub fn layout_report(
    records: &[HistoryRecord],
    statistics: Option<&AggregateStatistics>,
    include_chart: bool,
) -> ExportResult<ReportLayout> {
    if records.is_empty() {
        return Err(ExportError::EmptyHistory);
    }

    let mut ops = Vec::new();
    let mut pages = 1;

    ops.push(ReportOp::Text {
        x: MARGIN_X_MM,
        y: TITLE_Y_MM,
        pt: TITLE_PT,
        content: REPORT_TITLE.to_string(),
    });

    if let Some(stats) = statistics {
        let lines = [
            format!("Total Files Processed: {}", stats.total_files),
            format!(
                "Total Original Size: {}",
                format_file_size(stats.total_original_size)
            ),
            format!(
                "Total Compressed Size: {}",
                format_file_size(stats.total_compressed_size)
            ),
            format!(
                "Average Compression Ratio: {}%",
                stats.average_compression_ratio
            ),
            format!("Best Compression Ratio: {}%", stats.best_compression_ratio),
        ];
        for (i, content) in lines.into_iter().enumerate() {
            ops.push(ReportOp::Text {
                x: MARGIN_X_MM,
                y: STATS_START_Y_MM + STATS_STEP_MM * i as f32,
                pt: STATS_PT,
                content,
            });
        }
    }

    let mut y = RECORDS_START_Y_MM;
    for (i, record) in records.iter().enumerate() {
        let line = record_line(i, record);
        for wrapped in textwrap::wrap(&line, WRAP_COLUMNS) {
            ops.push(ReportOp::Text {
                x: MARGIN_X_MM,
                y,
                pt: RECORD_PT,
                content: wrapped.into_owned(),
            });
            y += LINE_STEP_MM;
        }

        // Break after the record that crossed the threshold, never inside it
        if y > PAGE_BREAK_Y_MM {
            ops.push(ReportOp::NewPage);
            pages += 1;
            y = FRESH_PAGE_Y_MM;
        }
    }

    if include_chart {
        if y > CHART_FIT_LIMIT_Y_MM {
            ops.push(ReportOp::NewPage);
            pages += 1;
            y = FRESH_PAGE_Y_MM;
        }
        ops.push(ReportOp::Chart {
            x: MARGIN_X_MM,
            y: y + CHART_GAP_MM,
        });
    }

    Ok(ReportLayout { ops, pages })
}

/// Compact single line for one record
fn record_line(index: usize, record: &HistoryRecord) -> String {
    format!(
        "{}. {} | {} | Orig: {} | Comp: {} | Ratio: {}% | Quality: {}",
        index + 1,
        record.filename,
        record.short_date(),
        format_file_size(record.original_size),
        format_file_size(record.compressed_size),
        record.compression_ratio,
        record.quality
    )
}

/// Lay out and write the report. Returns the layout so callers can
/// report page counts.
pub fn write_report(
    path: &Path,
    records: &[HistoryRecord],
    statistics: Option<&AggregateStatistics>,
    chart: Option<&ChartSnapshot>,
) -> ExportResult<ReportLayout> {
    let layout = layout_report(records, statistics, chart.is_some())?;

    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Render(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    for op in &layout.ops {
        match op {
            ReportOp::Text { x, y, pt, content } => {
                // PDF origin is bottom-left; the layout runs top-down
                layer.use_text(content.clone(), *pt, Mm(*x), Mm(PAGE_HEIGHT_MM - *y), &font);
            }
            ReportOp::NewPage => {
                let (page, new_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(new_layer);
            }
            ReportOp::Chart { x, y } => {
                let Some(snapshot) = chart else {
                    continue;
                };
                let raster =
                    RgbImage::from_raw(snapshot.width, snapshot.height, snapshot.rgb.clone())
                        .ok_or_else(|| {
                            ExportError::Render("chart raster size mismatch".to_string())
                        })?;
                let image = printpdf::Image::from_dynamic_image(&DynamicImage::ImageRgb8(raster));
                image.add_to_layer(
                    layer.clone(),
                    ImageTransform {
                        translate_x: Some(Mm(*x)),
                        translate_y: Some(Mm(PAGE_HEIGHT_MM - *y - CHART_HEIGHT_MM)),
                        dpi: Some(CHART_DPI),
                        ..Default::default()
                    },
                );
            }
        }
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ExportError::Render(e.to_string()))?;

    Ok(layout)
}
