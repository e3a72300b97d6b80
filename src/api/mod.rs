//! HTTP client for the remote image compression service
//!
//! This module owns the wire contract: endpoint paths, request shapes, and
//! the typed response envelopes. Anything beyond the envelope (per-file
//! entries, outcome classification) is handled by `crate::batch`.
//!
//! # Endpoints
//!
//! - `POST /upload-images/{quality}/{max_size}/{aspect_ratio}/{method}` -- JPEG batch
//! - `POST /compress-huffman` -- lossless batch
//! - `GET /history?sort_by=&order=` -- compression history, server-sorted
//! - `GET /history/statistics` -- aggregate statistics
//! - `DELETE /history/clear` -- destructive history wipe
//! - `GET /compression-methods` -- method availability catalog
//! - `GET /test-connection` -- liveness probe with feature flags
//!
//! # Example
//!
//! ```ignore
//! use squeeze::api::ApiClient;
//! use squeeze::config::{ClientConfig, SortKey, SortOrder};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(&ClientConfig::default())?;
//!     let envelope = client.fetch_history(SortKey::Date, SortOrder::Desc).await?;
//!     println!("{} records", envelope.history.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use types::{
    BatchResponse, ClearAck, ConnectionStatus, HistoryEnvelope, MethodCatalog, MethodInfo,
    MAX_FILE_BYTES,
};
