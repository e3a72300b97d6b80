/*!
 * Squeeze - Batch Image Compression Client
 *
 * A client library for a remote image-compression service with:
 * - Batch submission with a strict single-flight lifecycle
 * - Per-file outcome normalization (JPEG, Huffman, and error shapes)
 * - Atomic history synchronization against the service
 * - Aggregate statistics, local or service-computed
 * - Deterministic CSV and paginated PDF report exports
 * - History chart rasterization for report embedding
 */

pub mod api;
pub mod batch;
pub mod cli_style;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod logging;
pub mod stats;

// Re-export commonly used types
pub use api::{ApiClient, ApiError};
pub use batch::{BatchController, BatchJob, BatchOutput, BatchSummary, PerFileOutcome};
pub use config::{AspectRatio, ClientConfig, ColorTheme, CompressionMethod, SortKey, SortOrder};
pub use error::{Result, SqueezeError};
pub use history::{HistoryCache, HistoryRecord};
pub use stats::{compute_statistics, AggregateStatistics};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
