//! Aggregate statistics over the compression history
//!
//! The service computes these server-side; [`compute_statistics`] is the
//! same reduction run locally over the cached replica, used as a
//! fallback when the statistics endpoint cannot be reached.

use crate::history::HistoryRecord;
use serde::{Deserialize, Serialize};

/// Summary counters over the whole history
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateStatistics {
    pub total_files: u64,
    pub total_original_size: u64,
    pub total_compressed_size: u64,

    /// Mean of per-record ratios, rounded to two decimal places
    pub average_compression_ratio: f64,

    /// Maximum per-record ratio
    pub best_compression_ratio: f64,
}

/// Reduce statistics from a record set. Empty input yields all zeros
/// rather than an error, matching what the service reports for an empty
/// history.
pub fn compute_statistics(records: &[HistoryRecord]) -> AggregateStatistics {
    if records.is_empty() {
        return AggregateStatistics::default();
    }

    let total_original: u64 = records.iter().map(|r| r.original_size).sum();
    let total_compressed: u64 = records.iter().map(|r| r.compressed_size).sum();
    let ratio_sum: f64 = records.iter().map(|r| r.compression_ratio).sum();
    let best = records
        .iter()
        .map(|r| r.compression_ratio)
        .fold(f64::MIN, f64::max);

    let average = ratio_sum / records.len() as f64;

    AggregateStatistics {
        total_files: records.len() as u64,
        total_original_size: total_original,
        total_compressed_size: total_compressed,
        average_compression_ratio: (average * 100.0).round() / 100.0,
        best_compression_ratio: best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(original: u64, compressed: u64, ratio: f64) -> HistoryRecord {
        serde_json::from_str(&format!(
            r#"{{
                "filename": "f.jpg",
                "original_size": {},
                "compressed_size": {},
                "compression_ratio": {}
            }}"#,
            original, compressed, ratio
        ))
        .unwrap()
    }

    #[test]
    fn test_empty_history_yields_zeros() {
        assert_eq!(compute_statistics(&[]), AggregateStatistics::default());
    }

    #[test]
    fn test_matches_server_zero_shape() {
        // What the service returns for an empty history
        let server: AggregateStatistics = serde_json::from_str(
            r#"{
                "total_files": 0,
                "total_original_size": 0,
                "total_compressed_size": 0,
                "average_compression_ratio": 0,
                "best_compression_ratio": 0
            }"#,
        )
        .unwrap();

        assert_eq!(compute_statistics(&[]), server);
    }

    #[test]
    fn test_sums_and_count() {
        let records = vec![record(100_000, 60_000, 40.0), record(50_000, 40_000, 20.0)];
        let stats = compute_statistics(&records);

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_original_size, 150_000);
        assert_eq!(stats.total_compressed_size, 100_000);
    }

    #[test]
    fn test_average_rounds_to_two_places() {
        let records = vec![
            record(10, 9, 10.0),
            record(10, 8, 21.0),
            record(10, 10, 0.0),
        ];
        let stats = compute_statistics(&records);
        // (10 + 21 + 0) / 3 = 10.333...
        assert!((stats.average_compression_ratio - 10.33).abs() < f64::EPSILON);
    }

    #[test]
    fn test_best_is_maximum_regardless_of_order() {
        let records = vec![
            record(10, 9, 12.5),
            record(10, 2, 80.0),
            record(10, 5, 50.0),
        ];
        let stats = compute_statistics(&records);
        assert!((stats.best_compression_ratio - 80.0).abs() < f64::EPSILON);
    }
}
