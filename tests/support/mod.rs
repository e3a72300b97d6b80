#![allow(dead_code)]

/*!
 * In-process mock of the compression service.
 *
 * Speaks the same wire shapes as the real service: multipart uploads,
 * history with sort parameters, statistics, clear, capability and
 * health probes. Failure modes are switchable per test through the
 * shared state, and fabricated outcomes are deterministic so tests can
 * assert exact values. No actual compression happens here.
 */

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use squeeze::config::ClientConfig;

/// Bytes every fabricated JPEG payload decodes to
pub const PREVIEW_BYTES: &[u8] = b"squeezed-jpeg-bytes";

/// Timestamp stamped on history records created by uploads, in the
/// server's naive ISO-8601 form
pub const UPLOAD_TIMESTAMP: &str = "2024-05-11T09:30:00.123456";

#[derive(Default)]
pub struct ServiceState {
    pub history: Vec<Value>,
    pub fail_uploads: bool,
    pub fail_history: bool,
    pub fail_statistics: bool,
    pub fail_clear: bool,
    pub huffman_available: bool,
    pub upload_count: usize,
    pub last_sort: Option<(String, String)>,
    pub last_output_folder: Option<String>,
}

pub type SharedState = Arc<Mutex<ServiceState>>;

/// One running mock service bound to an ephemeral port.
pub struct MockService {
    pub addr: SocketAddr,
    pub state: SharedState,
}

impl MockService {
    /// Bind to an ephemeral port and serve until the test runtime drops.
    pub async fn spawn() -> Self {
        let state: SharedState = Arc::new(Mutex::new(ServiceState {
            huffman_available: true,
            ..Default::default()
        }));

        let router = Router::new()
            .route(
                "/upload-images/:quality/:max_size/:aspect/:method",
                post(upload_images),
            )
            .route("/compress-huffman", post(compress_huffman))
            .route("/history", get(history))
            .route("/history/statistics", get(statistics))
            .route("/history/clear", delete(clear))
            .route("/compression-methods", get(methods))
            .route("/test-connection", get(test_connection))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock");
        });

        MockService { addr, state }
    }

    /// Client configuration pointed at this mock, progress output off.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            service_url: format!("http://{}", self.addr),
            show_progress: false,
            ..Default::default()
        }
    }

    pub fn seed_history(&self, records: Vec<Value>) {
        self.state.lock().unwrap().history.extend(records);
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().unwrap().history.len()
    }

    pub fn upload_count(&self) -> usize {
        self.state.lock().unwrap().upload_count
    }

    pub fn last_sort(&self) -> Option<(String, String)> {
        self.state.lock().unwrap().last_sort.clone()
    }

    pub fn last_output_folder(&self) -> Option<String> {
        self.state.lock().unwrap().last_output_folder.clone()
    }
}

/// Build one canned history record the way the service stores it.
pub fn history_record(
    filename: &str,
    timestamp: &str,
    original_size: u64,
    compressed_size: u64,
    quality: u32,
    aspect_ratio: &str,
) -> Value {
    json!({
        "filename": filename,
        "timestamp": timestamp,
        "original_size": original_size,
        "compressed_size": compressed_size,
        "compression_ratio": ratio_of(original_size, compressed_size),
        "quality": quality,
        "aspect_ratio": aspect_ratio,
        "compression_method": "jpeg",
        "original_dimensions": [800, 600],
        "final_dimensions": [800, 600],
    })
}

fn ratio_of(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    ((1.0 - compressed as f64 / original as f64) * 100.0 * 100.0).round() / 100.0
}

async fn upload_images(
    State(state): State<SharedState>,
    Path((quality, _max_size, aspect, _method)): Path<(u32, u64, String, String)>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let fail = {
        let mut guard = state.lock().unwrap();
        guard.upload_count += 1;
        guard.last_output_folder = headers
            .get("X-Output-Folder")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        guard.fail_uploads
    };
    if fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "disk full"})),
        )
            .into_response();
    }

    let mut processed = Vec::new();
    let mut appended = Vec::new();

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        if field.name() != Some("images") {
            continue;
        }
        let filename = field.file_name().unwrap_or("unknown").to_string();
        let data = field.bytes().await.expect("field bytes");

        // Filenames containing "corrupt" fail the way an undecodable
        // image does on the real service
        if filename.contains("corrupt") {
            processed.push(json!({
                "filename": filename,
                "error": "Processing failed: cannot identify image file",
            }));
            continue;
        }

        let original_size = data.len() as u64;
        let compressed_size = original_size / 2;
        processed.push(json!({
            "filename": filename,
            "original_size": original_size,
            "compressed_size": compressed_size,
            "compression_ratio": ratio_of(original_size, compressed_size),
            "original_dimensions": [800, 600],
            "final_dimensions": [800, 600],
            "compressed_data": BASE64.encode(PREVIEW_BYTES),
        }));
        appended.push(history_record(
            &filename,
            UPLOAD_TIMESTAMP,
            original_size,
            compressed_size,
            quality,
            &aspect,
        ));
    }

    let total_files = processed.len();
    state.lock().unwrap().history.extend(appended);

    Json(json!({
        "message": "Images processed successfully",
        "processed_files": processed,
        "total_files": total_files,
    }))
    .into_response()
}

async fn compress_huffman(
    State(state): State<SharedState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let fail = {
        let mut guard = state.lock().unwrap();
        guard.upload_count += 1;
        guard.last_output_folder = headers
            .get("X-Output-Folder")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        guard.fail_uploads
    };
    if fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "disk full"})),
        )
            .into_response();
    }

    let mut processed = Vec::new();
    let mut appended = Vec::new();

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        if field.name() != Some("images") {
            continue;
        }
        let filename = field.file_name().unwrap_or("unknown").to_string();
        let data = field.bytes().await.expect("field bytes");

        if filename.contains("corrupt") {
            processed.push(json!({
                "filename": filename,
                "error": "Processing failed: cannot identify image file",
            }));
            continue;
        }

        let original_size = data.len() as u64;
        let compressed_size = original_size * 6 / 10;
        processed.push(json!({
            "filename": filename,
            "original_size": original_size,
            "compressed_size": compressed_size,
            "compression_ratio": ratio_of(original_size, compressed_size),
            "original_bits": original_size * 8,
            "compressed_bits": compressed_size * 8,
            "output_path": format!("huffman_compressed/{}.huff", filename),
            "compression_method": "huffman",
        }));

        let mut record = history_record(
            &filename,
            UPLOAD_TIMESTAMP,
            original_size,
            compressed_size,
            0,
            "original",
        );
        record["compression_method"] = json!("huffman");
        record["original_bits"] = json!(original_size * 8);
        record["compressed_bits"] = json!(compressed_size * 8);
        appended.push(record);
    }

    let total_files = processed.len();
    state.lock().unwrap().history.extend(appended);

    Json(json!({
        "message": "Images processed successfully",
        "processed_files": processed,
        "total_files": total_files,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct SortParams {
    sort_by: Option<String>,
    order: Option<String>,
}

async fn history(
    State(state): State<SharedState>,
    Query(params): Query<SortParams>,
) -> Response {
    let mut guard = state.lock().unwrap();
    if guard.fail_history {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "history backend offline"})),
        )
            .into_response();
    }

    let sort_by = params.sort_by.unwrap_or_else(|| "date".to_string());
    let order = params.order.unwrap_or_else(|| "desc".to_string());
    guard.last_sort = Some((sort_by.clone(), order.clone()));

    Json(json!({
        "history": guard.history,
        "total_records": guard.history.len(),
        "sort_by": sort_by,
        "order": order,
    }))
    .into_response()
}

async fn statistics(State(state): State<SharedState>) -> Response {
    let guard = state.lock().unwrap();
    if guard.fail_statistics {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "statistics backend offline"})),
        )
            .into_response();
    }

    if guard.history.is_empty() {
        return Json(json!({
            "total_files": 0,
            "total_original_size": 0,
            "total_compressed_size": 0,
            "average_compression_ratio": 0,
            "best_compression_ratio": 0,
        }))
        .into_response();
    }

    let total_original: u64 = guard
        .history
        .iter()
        .filter_map(|r| r["original_size"].as_u64())
        .sum();
    let total_compressed: u64 = guard
        .history
        .iter()
        .filter_map(|r| r["compressed_size"].as_u64())
        .sum();
    let ratios: Vec<f64> = guard
        .history
        .iter()
        .filter_map(|r| r["compression_ratio"].as_f64())
        .collect();
    let average = (ratios.iter().sum::<f64>() / ratios.len() as f64 * 100.0).round() / 100.0;
    let best = ratios.iter().cloned().fold(f64::MIN, f64::max);

    Json(json!({
        "total_files": guard.history.len(),
        "total_original_size": total_original,
        "total_compressed_size": total_compressed,
        "average_compression_ratio": average,
        "best_compression_ratio": best,
    }))
    .into_response()
}

async fn clear(State(state): State<SharedState>) -> Response {
    let mut guard = state.lock().unwrap();
    if guard.fail_clear {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "database locked"})),
        )
            .into_response();
    }

    guard.history.clear();
    Json(json!({"message": "History cleared successfully"})).into_response()
}

async fn methods(State(state): State<SharedState>) -> Response {
    let huffman = state.lock().unwrap().huffman_available;
    Json(json!({
        "compression_methods": {
            "jpeg": {"name": "JPEG Compression", "available": true},
            "huffman": {"name": "Huffman Coding (Lossless)", "available": huffman},
        }
    }))
    .into_response()
}

async fn test_connection(State(state): State<SharedState>) -> Response {
    let huffman = state.lock().unwrap().huffman_available;
    Json(json!({
        "status": "success",
        "message": "Compression service is running",
        "huffman_available": huffman,
    }))
    .into_response()
}
