/*!
 * Batch submission pipeline.
 *
 * A batch is one user-initiated submission of files with one compression
 * method and parameter set. The flow runs in three stages:
 *
 * 1. [`BatchController::submit`] validates the selection and dispatches it
 *    to the method-specific service endpoint.
 * 2. Each element of the response array is normalized into a
 *    [`PerFileOutcome`], with successes and per-file failures interleaved
 *    in submission order.
 * 3. A [`BatchSummary`] is reduced from the outcomes; only outcomes
 *    without an error contribute to the totals.
 *
 * A transport-level failure fails the whole batch with a single error and
 * zero outcomes. Per-file failures do not: the batch completes with
 * partial results.
 */

mod controller;
mod outcome;

pub use controller::{BatchController, BatchOutput, JobState};
pub use outcome::{normalize, FileError, HuffmanOutcome, JpegOutcome, PerFileOutcome};

use crate::config::{AspectRatio, ClientConfig, CompressionMethod};
use std::path::PathBuf;

/// Parameters for one batch submission. Built from configuration after
/// command-line overrides have been merged in, and never persisted.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Files to upload, in submission order
    pub files: Vec<PathBuf>,

    /// JPEG quality, 1-100
    pub quality: u8,

    /// Aspect ratio conversion to request
    pub aspect_ratio: AspectRatio,

    /// Which coder to dispatch the batch to
    pub method: CompressionMethod,

    /// Folder compressed output should land in
    pub output_dir: Option<PathBuf>,

    /// Whether to decode and save returned preview payloads locally
    pub save_previews: bool,
}

impl BatchJob {
    /// Build a job from effective configuration
    pub fn from_config(files: Vec<PathBuf>, config: &ClientConfig) -> Self {
        Self {
            files,
            quality: config.quality,
            aspect_ratio: config.aspect_ratio,
            method: config.method,
            output_dir: config.output_dir.clone(),
            save_previews: config.save_compressed,
        }
    }
}

/// Totals for one finished batch, reduced from its outcomes
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Files the service compressed
    pub succeeded: u64,

    /// Files the service rejected or could not process
    pub failed: u64,

    /// Bytes in, over succeeded files only
    pub total_original: u64,

    /// Bytes out, over succeeded files only
    pub total_compressed: u64,

    /// Wall-clock time for the whole submission
    pub duration_secs: f64,
}

impl BatchSummary {
    /// Reduce a summary from normalized outcomes. Error outcomes count
    /// toward `failed` and contribute nothing to the byte totals.
    pub fn from_outcomes(outcomes: &[PerFileOutcome], duration_secs: f64) -> Self {
        let mut summary = Self {
            duration_secs,
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome {
                PerFileOutcome::Jpeg(jpeg) => {
                    summary.succeeded += 1;
                    summary.total_original += jpeg.original_size;
                    summary.total_compressed += jpeg.compressed_size;
                }
                PerFileOutcome::Huffman(huffman) => {
                    summary.succeeded += 1;
                    summary.total_original += huffman.original_size;
                    summary.total_compressed += huffman.compressed_size;
                }
                PerFileOutcome::Error(_) => summary.failed += 1,
            }
        }

        summary
    }

    /// Overall space saved as a percentage of the original bytes
    pub fn reduction_percent(&self) -> f64 {
        if self.total_original == 0 {
            0.0
        } else {
            (1.0 - self.total_compressed as f64 / self.total_original as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_outcome(original: u64, compressed: u64) -> PerFileOutcome {
        PerFileOutcome::Jpeg(JpegOutcome {
            filename: "photo.jpg".to_string(),
            original_size: original,
            compressed_size: compressed,
            compression_ratio: 0.0,
            original_dimensions: None,
            final_dimensions: None,
            compressed_data: None,
            output_path: None,
        })
    }

    #[test]
    fn test_summary_counts_errors_separately() {
        let outcomes = vec![
            jpeg_outcome(100_000, 60_000),
            PerFileOutcome::Error(FileError {
                filename: "broken.png".to_string(),
                message: "Processing failed".to_string(),
            }),
            jpeg_outcome(50_000, 20_000),
        ];

        let summary = BatchSummary::from_outcomes(&outcomes, 1.5);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_original, 150_000);
        assert_eq!(summary.total_compressed, 80_000);
        assert!((summary.duration_secs - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_reduction_percent() {
        let summary = BatchSummary::from_outcomes(&[jpeg_outcome(100_000, 60_000)], 0.1);
        assert!((summary.reduction_percent() - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_summary_reduction_percent_empty() {
        let summary = BatchSummary::from_outcomes(&[], 0.0);
        assert_eq!(summary.reduction_percent(), 0.0);
    }

    #[test]
    fn test_job_from_config() {
        let config = ClientConfig::default();
        let job = BatchJob::from_config(vec![PathBuf::from("a.jpg")], &config);
        assert_eq!(job.quality, config.quality);
        assert_eq!(job.method, config.method);
        assert!(job.save_previews);
    }
}
