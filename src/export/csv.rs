//! CSV export
//!
//! Fixed schema, one row per record in the cache's current order. String
//! fields are quoted with embedded quotes doubled; numeric fields are
//! written bare. The output round-trips through any RFC 4180 reader.

use super::{ExportError, ExportResult};
use crate::history::HistoryRecord;

/// Header row; the column set is part of the artifact contract
const CSV_HEADER: &str = "Filename,Date,Original Size (bytes),Compressed Size (bytes),Compression Ratio (%),Quality,Aspect Ratio";

/// Render the record set as CSV text. Refuses an empty history.
pub fn to_csv(records: &[HistoryRecord]) -> ExportResult<String> {
    if records.is_empty() {
        return Err(ExportError::EmptyHistory);
    }

    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 96);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        out.push_str(&quoted(&record.filename));
        out.push(',');
        out.push_str(&quoted(&record.csv_date()));
        out.push(',');
        out.push_str(&record.original_size.to_string());
        out.push(',');
        out.push_str(&record.compressed_size.to_string());
        out.push(',');
        out.push_str(&record.compression_ratio.to_string());
        out.push(',');
        out.push_str(&record.quality.to_string());
        out.push(',');
        out.push_str(&quoted(record.aspect_ratio.as_deref().unwrap_or("")));
        out.push('\n');
    }

    Ok(out)
}

/// Quote a string field, doubling embedded quotes
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
