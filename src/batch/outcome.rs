//! Per-file outcome normalization
//!
//! The service interleaves success payloads and `{filename, error}`
//! objects in one response array, and the two coders return different
//! success shapes. [`normalize`] maps each raw element into one tagged
//! [`PerFileOutcome`] so nothing downstream branches on ad-hoc field
//! presence. Normalization never fails: an entry that fits neither shape
//! becomes an error outcome with a synthetic message.

use crate::config::CompressionMethod;
use serde_json::Value;

/// Synthetic error message for entries missing required fields
const MALFORMED_MESSAGE: &str = "malformed response";

/// Fallback when an entry carries no usable filename
const UNKNOWN_FILENAME: &str = "unknown";

/// Normalized result for one file of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum PerFileOutcome {
    /// Lossy compression succeeded
    Jpeg(JpegOutcome),

    /// Lossless coding succeeded
    Huffman(HuffmanOutcome),

    /// The service could not process this file
    Error(FileError),
}

/// Success payload for the quality-based coder
#[derive(Debug, Clone, PartialEq)]
pub struct JpegOutcome {
    pub filename: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Percentage saved, as reported or derived from the sizes
    pub compression_ratio: f64,
    /// Width and height before processing
    pub original_dimensions: Option<(u32, u32)>,
    /// Width and height after aspect conversion
    pub final_dimensions: Option<(u32, u32)>,
    /// Base64-encoded compressed bytes for preview and local saving
    pub compressed_data: Option<String>,
    /// Where the service wrote its copy, if it reported one
    pub output_path: Option<String>,
}

/// Success payload for the lossless coder. The output is a binary
/// symbol stream, so there is no inline preview.
#[derive(Debug, Clone, PartialEq)]
pub struct HuffmanOutcome {
    pub filename: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: f64,
    pub original_bits: Option<u64>,
    pub compressed_bits: Option<u64>,
    pub output_path: Option<String>,
}

/// Per-file failure reported by the service
#[derive(Debug, Clone, PartialEq)]
pub struct FileError {
    pub filename: String,
    pub message: String,
}

impl PerFileOutcome {
    pub fn filename(&self) -> &str {
        match self {
            PerFileOutcome::Jpeg(jpeg) => &jpeg.filename,
            PerFileOutcome::Huffman(huffman) => &huffman.filename,
            PerFileOutcome::Error(err) => &err.filename,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PerFileOutcome::Error(_))
    }
}

/// Map one raw response element into an outcome for the given method.
///
/// An entry carrying an `error` field becomes an error outcome with no
/// size or ratio fields trusted. An entry missing either required size
/// becomes an error outcome with a synthetic message, so one malformed
/// entry cannot abort the rest of the batch.
pub fn normalize(entry: &Value, method: CompressionMethod) -> PerFileOutcome {
    let filename = entry
        .get("filename")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_FILENAME)
        .to_string();

    if let Some(error) = entry.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return PerFileOutcome::Error(FileError { filename, message });
    }

    let (original_size, compressed_size) =
        match (int_field(entry, "original_size"), int_field(entry, "compressed_size")) {
            (Some(original), Some(compressed)) => (original, compressed),
            _ => {
                return PerFileOutcome::Error(FileError {
                    filename,
                    message: MALFORMED_MESSAGE.to_string(),
                })
            }
        };

    let compression_ratio = entry
        .get("compression_ratio")
        .and_then(Value::as_f64)
        .unwrap_or_else(|| derived_ratio(original_size, compressed_size));

    let output_path = entry
        .get("output_path")
        .and_then(Value::as_str)
        .map(str::to_string);

    match method {
        CompressionMethod::Jpeg => PerFileOutcome::Jpeg(JpegOutcome {
            filename,
            original_size,
            compressed_size,
            compression_ratio,
            original_dimensions: pair_field(entry, "original_dimensions"),
            final_dimensions: pair_field(entry, "final_dimensions"),
            compressed_data: entry
                .get("compressed_data")
                .and_then(Value::as_str)
                .map(str::to_string),
            output_path,
        }),
        CompressionMethod::Huffman => PerFileOutcome::Huffman(HuffmanOutcome {
            filename,
            original_size,
            compressed_size,
            compression_ratio,
            original_bits: int_field(entry, "original_bits"),
            compressed_bits: int_field(entry, "compressed_bits"),
            output_path,
        }),
    }
}

/// Percentage saved, matching what the service reports when it computes
/// the ratio itself
fn derived_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    let ratio = (1.0 - compressed as f64 / original as f64) * 100.0;
    (ratio * 100.0).round() / 100.0
}

/// Read a non-negative integer field, tolerating a float encoding
fn int_field(entry: &Value, key: &str) -> Option<u64> {
    let value = entry.get(key)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

/// Read a `[width, height]` pair
fn pair_field(entry: &Value, key: &str) -> Option<(u32, u32)> {
    let array = entry.get(key)?.as_array()?;
    let width = u32::try_from(array.first()?.as_u64()?).ok()?;
    let height = u32::try_from(array.get(1)?.as_u64()?).ok()?;
    Some((width, height))
}
