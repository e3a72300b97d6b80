//! Batch submission lifecycle
//!
//! The controller owns the request lifecycle for one batch at a time:
//!
//! ```text
//! Idle -> Validating -> Submitting -> AwaitingResponse -> Reconciling -> Complete
//!                  \                               \
//!                   -> Failed                       -> Failed
//! ```
//!
//! Exactly one submission may be in flight. The guard is checked
//! programmatically, not left to the caller, so the invariant holds from
//! every call site. State lives in a [`Cell`]: the crate runs on a
//! single-threaded runtime and submissions only interleave at await
//! points.

use super::outcome::{normalize, PerFileOutcome};
use super::{BatchJob, BatchSummary};
use crate::api::ApiClient;
use crate::config::CompressionMethod;
use crate::error::{Result, SqueezeError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::cell::Cell;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Lifecycle state of the current (or last) batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Validating,
    Submitting,
    AwaitingResponse,
    Reconciling,
    Complete,
    Failed,
}

impl JobState {
    /// True while a submission holds the controller
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            JobState::Validating
                | JobState::Submitting
                | JobState::AwaitingResponse
                | JobState::Reconciling
        )
    }
}

/// Everything a finished batch produced
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// One outcome per submitted file, in submission order
    pub outcomes: Vec<PerFileOutcome>,

    /// Totals over the non-error outcomes
    pub summary: BatchSummary,

    /// Top-level message from the service, if any
    pub message: Option<String>,
}

/// Serializes batch submissions and drives each one through its states
#[derive(Debug)]
pub struct BatchController {
    state: Cell<JobState>,
}

impl BatchController {
    pub fn new() -> Self {
        Self {
            state: Cell::new(JobState::Idle),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> JobState {
        self.state.get()
    }

    /// Forget the last batch and return to Idle
    pub fn reset(&self) {
        self.state.set(JobState::Idle);
    }

    /// Run one batch end to end.
    ///
    /// An empty selection is rejected before any state change or network
    /// traffic; it is a user-input error, not a batch failure. A
    /// transport-level failure fails the whole batch with zero outcomes.
    /// Per-file errors in the response leave the batch Complete with
    /// partial results.
    pub async fn submit(&self, client: &ApiClient, job: &BatchJob) -> Result<BatchOutput> {
        if self.state.get().is_in_flight() {
            return Err(SqueezeError::Other(
                "a batch is already in flight".to_string(),
            ));
        }
        if job.files.is_empty() {
            return Err(SqueezeError::EmptyBatch);
        }

        let started = Instant::now();

        self.state.set(JobState::Validating);
        for path in &job.files {
            if !path.is_file() {
                self.state.set(JobState::Failed);
                return Err(SqueezeError::FileNotFound(path.clone()));
            }
        }

        debug!(
            files = job.files.len(),
            method = job.method.as_str(),
            "submitting batch"
        );
        self.state.set(JobState::Submitting);
        self.state.set(JobState::AwaitingResponse);
        let response = match job.method {
            CompressionMethod::Jpeg => {
                client
                    .upload_jpeg(
                        &job.files,
                        job.quality,
                        job.aspect_ratio,
                        job.output_dir.as_deref(),
                    )
                    .await
            }
            CompressionMethod::Huffman => {
                client
                    .compress_huffman(&job.files, job.output_dir.as_deref())
                    .await
            }
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.state.set(JobState::Failed);
                return Err(SqueezeError::Api(e));
            }
        };

        self.state.set(JobState::Reconciling);
        let outcomes: Vec<PerFileOutcome> = response
            .processed_files
            .iter()
            .map(|entry| normalize(entry, job.method))
            .collect();

        if job.save_previews {
            if let Some(dir) = &job.output_dir {
                save_previews(dir, &outcomes).await;
            }
        }

        let summary = BatchSummary::from_outcomes(&outcomes, started.elapsed().as_secs_f64());
        self.state.set(JobState::Complete);
        debug!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch reconciled"
        );

        Ok(BatchOutput {
            outcomes,
            summary,
            message: response.message,
        })
    }
}

impl Default for BatchController {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode returned preview payloads and write them next to the service's
/// own output. Failures here are logged and swallowed: the batch already
/// completed and its results must stand.
async fn save_previews(dir: &Path, outcomes: &[PerFileOutcome]) {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!(dir = %dir.display(), error = %e, "cannot create output folder");
        return;
    }

    for outcome in outcomes {
        let PerFileOutcome::Jpeg(jpeg) = outcome else {
            continue;
        };
        let Some(data) = &jpeg.compressed_data else {
            continue;
        };

        match BASE64.decode(data) {
            Ok(bytes) => {
                let target = dir.join(&jpeg.filename);
                if let Err(e) = tokio::fs::write(&target, bytes).await {
                    warn!(file = %target.display(), error = %e, "cannot save compressed copy");
                }
            }
            Err(e) => {
                warn!(file = %jpeg.filename, error = %e, "preview payload is not valid base64");
            }
        }
    }
}
