/*!
 * Export artifacts from the compression history.
 *
 * Two deterministic artifacts are produced from the cached record set:
 *
 * - [`to_csv`]: a fixed-schema delimited text file that round-trips
 *   through any standard CSV reader.
 * - [`write_report`]: a paginated A4 PDF with a title block, aggregate
 *   statistics, one wrapped line per record, and an optional chart
 *   raster rendered by [`render_chart`].
 *
 * Both refuse an empty history rather than writing a hollow artifact.
 * Layout is a pure function of the input so identical histories always
 * produce identical page boundaries.
 */

mod chart;
mod csv;
mod report;

pub use chart::{render_chart, ChartSnapshot, CHART_HEIGHT_PX, CHART_WIDTH_PX};
pub use csv::to_csv;
pub use report::{layout_report, write_report, ReportLayout, ReportOp};

use thiserror::Error;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while producing an export artifact
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export; surfaced before any file is touched
    #[error("history is empty, nothing to export")]
    EmptyHistory,

    /// Document assembly failed
    #[error("report rendering failed: {0}")]
    Render(String),

    /// Chart raster could not be drawn
    #[error("chart rendering failed: {0}")]
    Chart(String),

    /// Failure writing the artifact to disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Human-readable size used inside export artifacts: one decimal place,
/// trailing `.0` trimmed, `Bytes` through `GB`.
///
/// Distinct from the two-decimal table formatting in `cli_style`; the
/// artifacts keep their own historical format so exports stay
/// byte-stable across client versions.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (value * 10.0).round() / 10.0;

    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[exponent])
    } else {
        format!("{:.1} {}", rounded, UNITS[exponent])
    }
}
