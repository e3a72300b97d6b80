//! Wire types for the compression service

use crate::history::HistoryRecord;
use crate::stats::AggregateStatistics;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Per-file size ceiling enforced by the service, sent as a path segment
/// on every JPEG batch submission.
pub const MAX_FILE_BYTES: u64 = 5_000_000;

/// Response envelope for a batch submission.
///
/// `processed_files` entries stay untyped here: the service interleaves
/// success payloads and `{filename, error}` objects in one array, and a
/// single bad entry must not fail the whole envelope. Classification
/// happens entry by entry in `crate::batch::normalize`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponse {
    /// Human-readable summary from the service
    #[serde(default)]
    pub message: Option<String>,

    /// One entry per submitted file, successes and failures interleaved
    pub processed_files: Vec<serde_json::Value>,

    /// Count reported by the service
    #[serde(default)]
    pub total_files: Option<u64>,
}

/// Response envelope for a history fetch
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEnvelope {
    /// Records in the exact order the service sorted them
    pub history: Vec<HistoryRecord>,

    /// Total record count reported by the service
    #[serde(default)]
    pub total_records: Option<u64>,

    /// Sort key echoed back by the service
    #[serde(default)]
    pub sort_by: Option<String>,

    /// Sort order echoed back by the service
    #[serde(default)]
    pub order: Option<String>,
}

/// Acknowledgement for a successful history clear
#[derive(Debug, Clone, Deserialize)]
pub struct ClearAck {
    pub message: String,
}

/// Liveness probe response
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionStatus {
    /// "success" when the service is healthy
    pub status: String,

    #[serde(default)]
    pub message: String,

    /// Whether the lossless coder is usable on the service host
    #[serde(default)]
    pub huffman_available: bool,
}

impl ConnectionStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "success"
    }
}

/// Catalog of compression methods the service offers
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCatalog {
    /// Keyed by wire token ("jpeg", "huffman"), ordered for stable display
    pub compression_methods: BTreeMap<String, MethodInfo>,
}

/// Availability entry for one compression method
#[derive(Debug, Clone, Deserialize)]
pub struct MethodInfo {
    /// Display name
    pub name: String,

    /// Whether the method can currently be used
    pub available: bool,
}

impl MethodCatalog {
    /// Fallback catalog used when the service cannot be queried: JPEG is
    /// always present, the lossless coder is marked unavailable until the
    /// service confirms otherwise.
    pub fn fallback() -> Self {
        let mut compression_methods = BTreeMap::new();
        compression_methods.insert(
            "jpeg".to_string(),
            MethodInfo {
                name: "JPEG Compression".to_string(),
                available: true,
            },
        );
        compression_methods.insert(
            "huffman".to_string(),
            MethodInfo {
                name: "Huffman Coding (Lossless)".to_string(),
                available: false,
            },
        );
        Self {
            compression_methods,
        }
    }
}
