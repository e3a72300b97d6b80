//! Local replica of the remote compression history
//!
//! The service owns the canonical record set. The client holds a volatile
//! replica that is replaced wholesale after every query or mutating
//! action, never patched in place, so the displayed order always matches
//! one authoritative server ordering. A failed refresh leaves the
//! previous replica untouched.

use crate::api::{ApiClient, ClearAck};
use crate::config::{SortKey, SortOrder};
use crate::error::Result;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::debug;

/// One persisted compression event, as stored by the service.
///
/// Records are immutable once created. Every field except `filename` is
/// optional or defaulted: records written by older service versions lack
/// the method tag and the lossless-only fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryRecord {
    pub filename: String,

    /// Server-assigned creation instant; kept verbatim and parsed lazily
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub original_size: u64,

    #[serde(default)]
    pub compressed_size: u64,

    /// Percentage saved, derived server-side
    #[serde(default)]
    pub compression_ratio: f64,

    /// JPEG quality used, meaningful for lossy records only
    #[serde(default)]
    pub quality: u32,

    /// Aspect token used, meaningful for lossy records only
    #[serde(default)]
    pub aspect_ratio: Option<String>,

    /// Wire token of the coder; absent on records predating the
    /// lossless coder
    #[serde(default)]
    pub compression_method: Option<String>,

    #[serde(default)]
    pub original_dimensions: Option<(u32, u32)>,

    #[serde(default)]
    pub final_dimensions: Option<(u32, u32)>,

    #[serde(default)]
    pub original_bits: Option<u64>,

    #[serde(default)]
    pub compressed_bits: Option<u64>,

    #[serde(default)]
    pub output_path: Option<String>,
}

impl HistoryRecord {
    /// Which coder produced this record. Records without a method tag
    /// predate the lossless coder and are treated as lossy.
    pub fn method(&self) -> crate::config::CompressionMethod {
        match self.compression_method.as_deref() {
            Some("huffman") => crate::config::CompressionMethod::Huffman,
            _ => crate::config::CompressionMethod::Jpeg,
        }
    }

    /// Parse the server timestamp. The service emits either RFC 3339 or
    /// a bare ISO datetime without offset; the latter is taken as UTC.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Timestamp for table display. An unparseable timestamp is shown
    /// verbatim rather than dropped.
    pub fn local_date(&self) -> String {
        match self.parsed_timestamp() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.timestamp.clone(),
        }
    }

    /// Timestamp for CSV export: RFC 3339 UTC with millisecond precision
    pub fn csv_date(&self) -> String {
        match self.parsed_timestamp() {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.timestamp.clone(),
        }
    }

    /// Calendar date only, for the compact per-record report lines
    pub fn short_date(&self) -> String {
        match self.parsed_timestamp() {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => self.timestamp.clone(),
        }
    }
}

/// Volatile, server-sorted snapshot of the history
#[derive(Debug, Default)]
pub struct HistoryCache {
    records: Vec<HistoryRecord>,
    total_records: u64,
    last_sort: Option<(SortKey, SortOrder)>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in the order the server sorted them
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record count the server reported with the last refresh
    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Sort the current snapshot was produced with
    pub fn last_sort(&self) -> Option<(SortKey, SortOrder)> {
        self.last_sort
    }

    /// Replace the replica with a fresh server-sorted snapshot.
    ///
    /// All-or-nothing: nothing is assigned until the fetch has decoded,
    /// so a failed refresh leaves the previous snapshot in place. The
    /// sort parameters are forwarded verbatim; no local sorting happens.
    pub async fn refresh(
        &mut self,
        client: &ApiClient,
        sort: SortKey,
        order: SortOrder,
    ) -> Result<()> {
        let envelope = client.fetch_history(sort, order).await?;
        debug!(
            records = envelope.history.len(),
            sort = sort.as_str(),
            order = order.as_str(),
            "history cache replaced"
        );

        self.total_records = envelope
            .total_records
            .unwrap_or(envelope.history.len() as u64);
        self.records = envelope.history;
        self.last_sort = Some((sort, order));
        Ok(())
    }

    /// Delete all records on the server, then resync through the same
    /// refresh path used everywhere else rather than emptying locally.
    /// Caller is responsible for having confirmed the deletion.
    pub async fn clear_via(&mut self, client: &ApiClient) -> Result<ClearAck> {
        let ack = client.clear_history().await?;
        let (sort, order) = self
            .last_sort
            .unwrap_or((SortKey::default(), SortOrder::default()));
        self.refresh(client, sort, order).await?;
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionMethod;

    fn record_from(body: &str) -> HistoryRecord {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_full_record_deserializes() {
        let record = record_from(
            r#"{
                "filename": "cat.jpg",
                "timestamp": "2024-05-11T09:30:00.123456",
                "original_size": 150000,
                "compressed_size": 90000,
                "compression_ratio": 40.0,
                "quality": 80,
                "aspect_ratio": "16:9",
                "compression_method": "jpeg",
                "original_dimensions": [1920, 1080],
                "final_dimensions": [1280, 720],
                "output_path": "/tmp/out/cat.jpg"
            }"#,
        );

        assert_eq!(record.filename, "cat.jpg");
        assert_eq!(record.original_dimensions, Some((1920, 1080)));
        assert_eq!(record.method(), CompressionMethod::Jpeg);
    }

    #[test]
    fn test_minimal_record_defaults() {
        let record = record_from(r#"{"filename": "old.jpg"}"#);
        assert_eq!(record.original_size, 0);
        assert_eq!(record.quality, 0);
        assert!(record.aspect_ratio.is_none());
        assert!(record.timestamp.is_empty());
    }

    #[test]
    fn test_record_without_filename_is_rejected() {
        assert!(serde_json::from_str::<HistoryRecord>(r#"{"original_size": 10}"#).is_err());
    }

    #[test]
    fn test_method_defaults_to_jpeg() {
        let record = record_from(r#"{"filename": "old.jpg"}"#);
        assert_eq!(record.method(), CompressionMethod::Jpeg);

        let record = record_from(r#"{"filename": "x.png", "compression_method": "huffman"}"#);
        assert_eq!(record.method(), CompressionMethod::Huffman);

        // Unknown tokens fall back the same way as absence
        let record = record_from(r#"{"filename": "x.png", "compression_method": "webp"}"#);
        assert_eq!(record.method(), CompressionMethod::Jpeg);
    }

    #[test]
    fn test_parses_bare_iso_timestamp_as_utc() {
        let record = record_from(
            r#"{"filename": "a.jpg", "timestamp": "2024-05-11T09:30:00.123456"}"#,
        );
        let parsed = record.parsed_timestamp().unwrap();
        assert_eq!(parsed.to_rfc3339_opts(SecondsFormat::Secs, true), "2024-05-11T09:30:00Z");
    }

    #[test]
    fn test_parses_rfc3339_timestamp() {
        let record = record_from(
            r#"{"filename": "a.jpg", "timestamp": "2024-05-11T09:30:00+02:00"}"#,
        );
        let parsed = record.parsed_timestamp().unwrap();
        assert_eq!(parsed.to_rfc3339_opts(SecondsFormat::Secs, true), "2024-05-11T07:30:00Z");
    }

    #[test]
    fn test_local_date_formats_or_passes_through() {
        let record = record_from(
            r#"{"filename": "a.jpg", "timestamp": "2024-05-11T09:30:00.123456"}"#,
        );
        assert_eq!(record.local_date(), "2024-05-11 09:30:00");

        let record = record_from(r#"{"filename": "a.jpg", "timestamp": "yesterday-ish"}"#);
        assert_eq!(record.local_date(), "yesterday-ish");
    }

    #[test]
    fn test_csv_date_uses_millisecond_utc() {
        let record = record_from(
            r#"{"filename": "a.jpg", "timestamp": "2024-05-11T09:30:00.123456"}"#,
        );
        assert_eq!(record.csv_date(), "2024-05-11T09:30:00.123Z");
    }

    #[test]
    fn test_short_date_is_calendar_day() {
        let record = record_from(
            r#"{"filename": "a.jpg", "timestamp": "2024-05-11T09:30:00.123456"}"#,
        );
        assert_eq!(record.short_date(), "2024-05-11");
    }

    #[test]
    fn test_cache_starts_empty() {
        let cache = HistoryCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.total_records(), 0);
        assert!(cache.last_sort().is_none());
    }
}
