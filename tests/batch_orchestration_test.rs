/*!
 * Integration tests for batch submission against a live mock service.
 *
 * Covers the full lifecycle: validation failures before any request is
 * made, successful batches, partial per-file failures, transport
 * failures, preview payload decoding, and the trailing history refresh.
 */

mod support;

use std::fs;
use tempfile::TempDir;

use squeeze::api::ApiClient;
use squeeze::batch::{BatchController, BatchJob, JobState, PerFileOutcome};
use squeeze::config::CompressionMethod;
use squeeze::error::{SqueezeError, EXIT_PARTIAL, EXIT_SUCCESS};
use squeeze::commands;
use squeeze::history::HistoryCache;
use support::MockService;

/// Write `count` fabricated image files of 1000 bytes each
fn write_images(dir: &TempDir, names: &[&str]) -> Vec<std::path::PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, [0x42u8; 1000]).unwrap();
            path
        })
        .collect()
}

#[tokio::test]
async fn test_batch_end_to_end_jpeg() {
    let mock = MockService::spawn().await;
    let config = mock.config();
    let dir = TempDir::new().unwrap();
    let files = write_images(&dir, &["cat.jpg", "dog.jpg"]);

    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    let controller = BatchController::new();

    let output = controller.submit(&client, &job).await.unwrap();

    assert_eq!(controller.state(), JobState::Complete);
    assert_eq!(output.outcomes.len(), 2);
    assert_eq!(output.message.as_deref(), Some("Images processed successfully"));

    match &output.outcomes[0] {
        PerFileOutcome::Jpeg(jpeg) => {
            assert_eq!(jpeg.filename, "cat.jpg");
            assert_eq!(jpeg.original_size, 1000);
            assert_eq!(jpeg.compressed_size, 500);
            assert_eq!(jpeg.compression_ratio, 50.0);
            assert_eq!(jpeg.original_dimensions, Some((800, 600)));
        }
        other => panic!("expected a jpeg outcome, got {:?}", other),
    }

    assert_eq!(output.summary.succeeded, 2);
    assert_eq!(output.summary.failed, 0);
    assert_eq!(output.summary.total_original, 2000);
    assert_eq!(output.summary.total_compressed, 1000);
    assert_eq!(output.summary.reduction_percent(), 50.0);
}

#[tokio::test]
async fn test_outcome_order_matches_submission_order() {
    let mock = MockService::spawn().await;
    let config = mock.config();
    let dir = TempDir::new().unwrap();
    let files = write_images(&dir, &["a.jpg", "corrupt_b.jpg", "c.jpg"]);

    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    let controller = BatchController::new();

    let output = controller.submit(&client, &job).await.unwrap();

    assert_eq!(output.outcomes.len(), 3);
    assert_eq!(output.outcomes[0].filename(), "a.jpg");
    assert_eq!(output.outcomes[1].filename(), "corrupt_b.jpg");
    assert_eq!(output.outcomes[2].filename(), "c.jpg");
    assert!(!output.outcomes[0].is_error());
    assert!(output.outcomes[1].is_error());
    assert!(!output.outcomes[2].is_error());
}

#[tokio::test]
async fn test_partial_failure_still_completes() {
    let mock = MockService::spawn().await;
    let config = mock.config();
    let dir = TempDir::new().unwrap();
    let files = write_images(&dir, &["ok.jpg", "corrupt.jpg"]);

    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    let controller = BatchController::new();

    let output = controller.submit(&client, &job).await.unwrap();

    // A per-file failure is a result, not a batch failure
    assert_eq!(controller.state(), JobState::Complete);
    assert_eq!(output.summary.succeeded, 1);
    assert_eq!(output.summary.failed, 1);

    match &output.outcomes[1] {
        PerFileOutcome::Error(err) => {
            assert_eq!(err.filename, "corrupt.jpg");
            assert_eq!(err.message, "Processing failed: cannot identify image file");
        }
        other => panic!("expected an error outcome, got {:?}", other),
    }

    // Totals cover successful outcomes only
    assert_eq!(output.summary.total_original, 1000);
    assert_eq!(output.summary.total_compressed, 500);
}

#[tokio::test]
async fn test_empty_batch_rejected_without_request() {
    let mock = MockService::spawn().await;
    let config = mock.config();

    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(Vec::new(), &config);
    let controller = BatchController::new();

    let result = controller.submit(&client, &job).await;

    assert!(matches!(result, Err(SqueezeError::EmptyBatch)));
    assert_eq!(controller.state(), JobState::Idle);
    assert_eq!(mock.upload_count(), 0);
}

#[tokio::test]
async fn test_missing_file_rejected_before_upload() {
    let mock = MockService::spawn().await;
    let config = mock.config();
    let dir = TempDir::new().unwrap();
    let mut files = write_images(&dir, &["present.jpg"]);
    files.push(dir.path().join("absent.jpg"));

    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    let controller = BatchController::new();

    let result = controller.submit(&client, &job).await;

    match result {
        Err(SqueezeError::FileNotFound(path)) => {
            assert!(path.ends_with("absent.jpg"));
        }
        other => panic!("expected FileNotFound, got {:?}", other),
    }
    assert_eq!(controller.state(), JobState::Failed);
    assert_eq!(mock.upload_count(), 0, "nothing may be uploaded");
}

#[tokio::test]
async fn test_transport_failure_fails_batch() {
    let mock = MockService::spawn().await;
    mock.state.lock().unwrap().fail_uploads = true;
    let config = mock.config();
    let dir = TempDir::new().unwrap();
    let files = write_images(&dir, &["cat.jpg"]);

    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    let controller = BatchController::new();

    let result = controller.submit(&client, &job).await;

    match result {
        Err(SqueezeError::Api(e)) => assert!(e.is_transient(), "5xx should be transient: {}", e),
        other => panic!("expected an API error, got {:?}", other),
    }
    assert_eq!(controller.state(), JobState::Failed);
}

#[tokio::test]
async fn test_huffman_batch() {
    let mock = MockService::spawn().await;
    let mut config = mock.config();
    config.method = CompressionMethod::Huffman;
    let dir = TempDir::new().unwrap();
    let files = write_images(&dir, &["archive.png"]);

    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    let controller = BatchController::new();

    let output = controller.submit(&client, &job).await.unwrap();

    match &output.outcomes[0] {
        PerFileOutcome::Huffman(huffman) => {
            assert_eq!(huffman.filename, "archive.png");
            assert_eq!(huffman.original_size, 1000);
            assert_eq!(huffman.compressed_size, 600);
            assert_eq!(huffman.original_bits, Some(8000));
            assert_eq!(huffman.compressed_bits, Some(4800));
            assert_eq!(
                huffman.output_path.as_deref(),
                Some("huffman_compressed/archive.png.huff")
            );
        }
        other => panic!("expected a huffman outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_previews_decoded_into_output_dir() {
    let mock = MockService::spawn().await;
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let mut config = mock.config();
    config.output_dir = Some(out.path().to_path_buf());
    config.save_compressed = true;

    let files = write_images(&dir, &["cat.jpg", "dog.jpg"]);
    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    let controller = BatchController::new();

    controller.submit(&client, &job).await.unwrap();

    for name in ["cat.jpg", "dog.jpg"] {
        let saved = out.path().join(name);
        assert!(saved.exists(), "preview for {} should be written", name);
        assert_eq!(fs::read(&saved).unwrap(), support::PREVIEW_BYTES);
    }
}

#[tokio::test]
async fn test_output_folder_header_forwarded() {
    let mock = MockService::spawn().await;
    let out = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    let mut config = mock.config();
    config.output_dir = Some(out.path().to_path_buf());
    config.save_compressed = false;

    let files = write_images(&dir, &["cat.jpg"]);
    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    BatchController::new().submit(&client, &job).await.unwrap();

    assert_eq!(
        mock.last_output_folder(),
        Some(out.path().to_string_lossy().into_owned())
    );
}

#[tokio::test]
async fn test_batch_appends_history() {
    let mock = MockService::spawn().await;
    let config = mock.config();
    let dir = TempDir::new().unwrap();
    let files = write_images(&dir, &["cat.jpg", "dog.jpg"]);

    let client = ApiClient::new(&config).unwrap();
    let job = BatchJob::from_config(files, &config);
    BatchController::new().submit(&client, &job).await.unwrap();

    let mut cache = HistoryCache::new();
    cache
        .refresh(&client, config.sort_by, config.order)
        .await
        .unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.total_records(), 2);
    let record = &cache.records()[0];
    assert_eq!(record.filename, "cat.jpg");
    assert_eq!(record.quality, 80);
    assert_eq!(record.compression_ratio, 50.0);
}

#[tokio::test]
async fn test_compress_command_exit_codes() {
    let mock = MockService::spawn().await;
    let config = mock.config();
    let dir = TempDir::new().unwrap();

    let files = write_images(&dir, &["ok.jpg"]);
    let code = commands::compress(&config, files).await.unwrap();
    assert_eq!(code, EXIT_SUCCESS);

    let files = write_images(&dir, &["fine.jpg", "corrupt.jpg"]);
    let code = commands::compress(&config, files).await.unwrap();
    assert_eq!(code, EXIT_PARTIAL);
}

#[tokio::test]
async fn test_controller_reusable_after_completion() {
    let mock = MockService::spawn().await;
    let config = mock.config();
    let dir = TempDir::new().unwrap();

    let client = ApiClient::new(&config).unwrap();
    let controller = BatchController::new();

    let job = BatchJob::from_config(write_images(&dir, &["one.jpg"]), &config);
    controller.submit(&client, &job).await.unwrap();
    assert_eq!(controller.state(), JobState::Complete);

    let job = BatchJob::from_config(write_images(&dir, &["two.jpg"]), &config);
    controller.submit(&client, &job).await.unwrap();
    assert_eq!(controller.state(), JobState::Complete);
    assert_eq!(mock.upload_count(), 2);
}
