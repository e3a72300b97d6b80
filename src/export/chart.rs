//! History chart raster
//!
//! Renders the same chart the history view is built around: per-run
//! original and compressed sizes as paired bars on the primary axis,
//! with the compression ratio as a line on a secondary 0-100 axis. The
//! output is a raw RGB raster sized for the report's fixed chart box;
//! the report embeds it without any intermediate encoding.

use super::{ExportError, ExportResult};
use crate::config::ColorTheme;
use crate::history::HistoryRecord;
use plotters::prelude::*;

/// Raster width in pixels; 180 mm at the report's 127 dpi
pub const CHART_WIDTH_PX: u32 = 900;

/// Raster height in pixels; 100 mm at the report's 127 dpi
pub const CHART_HEIGHT_PX: u32 = 500;

const RATIO_LINE: RGBColor = RGBColor(52, 152, 219);
const ORIGINAL_BAR: RGBColor = RGBColor(231, 76, 60);
const COMPRESSED_BAR: RGBColor = RGBColor(46, 204, 113);

const LIGHT_BACKGROUND: RGBColor = RGBColor(255, 255, 255);
const LIGHT_FRAME: RGBColor = RGBColor(60, 60, 60);
const DARK_BACKGROUND: RGBColor = RGBColor(30, 34, 39);
const DARK_FRAME: RGBColor = RGBColor(200, 200, 200);

/// Finished chart raster, tightly packed RGB8 rows top to bottom
#[derive(Debug, Clone)]
pub struct ChartSnapshot {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Rebuild the chart from the current cache. An empty cache yields no
/// chart rather than an empty axes frame.
pub fn render_chart(
    records: &[HistoryRecord],
    theme: ColorTheme,
) -> ExportResult<Option<ChartSnapshot>> {
    if records.is_empty() {
        return Ok(None);
    }

    let (background, frame) = match theme {
        ColorTheme::Light => (LIGHT_BACKGROUND, LIGHT_FRAME),
        ColorTheme::Dark => (DARK_BACKGROUND, DARK_FRAME),
    };

    let mut rgb = vec![0u8; (CHART_WIDTH_PX * CHART_HEIGHT_PX * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (CHART_WIDTH_PX, CHART_HEIGHT_PX))
            .into_drawing_area();
        root.fill(&background).map_err(chart_err)?;

        let runs = records.len() as f64;
        let max_kb = records
            .iter()
            .map(|r| r.original_size.max(r.compressed_size))
            .max()
            .unwrap_or(0) as f64
            / 1024.0;
        let size_top = if max_kb > 0.0 { max_kb * 1.1 } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .margin(16)
            .build_cartesian_2d(0.0..runs, 0.0..size_top)
            .map_err(chart_err)?
            .set_secondary_coord(0.0..runs, 0.0..100.0);

        // Paired bars per run, sizes in KB on the primary axis
        chart
            .draw_series(records.iter().enumerate().map(|(i, r)| {
                let x = i as f64;
                Rectangle::new(
                    [(x + 0.10, 0.0), (x + 0.45, r.original_size as f64 / 1024.0)],
                    ORIGINAL_BAR.filled(),
                )
            }))
            .map_err(chart_err)?;
        chart
            .draw_series(records.iter().enumerate().map(|(i, r)| {
                let x = i as f64;
                Rectangle::new(
                    [(x + 0.55, 0.0), (x + 0.90, r.compressed_size as f64 / 1024.0)],
                    COMPRESSED_BAR.filled(),
                )
            }))
            .map_err(chart_err)?;

        // Baseline under the bars
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, 0.0), (runs, 0.0)],
                frame.stroke_width(1),
            )))
            .map_err(chart_err)?;

        // Ratio line with point markers on the secondary 0-100 axis
        chart
            .draw_secondary_series(LineSeries::new(
                records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (i as f64 + 0.5, r.compression_ratio)),
                RATIO_LINE.stroke_width(2),
            ))
            .map_err(chart_err)?;
        chart
            .draw_secondary_series(records.iter().enumerate().map(|(i, r)| {
                Circle::new((i as f64 + 0.5, r.compression_ratio), 4, RATIO_LINE.filled())
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(Some(ChartSnapshot {
        width: CHART_WIDTH_PX,
        height: CHART_HEIGHT_PX,
        rgb,
    }))
}

fn chart_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Chart(e.to_string())
}
