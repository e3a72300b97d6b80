/*!
 * Command handlers for the Squeeze CLI
 *
 * Each handler composes the pieces a user-visible action needs: an
 * `ApiClient` for the wire, a `BatchController` for submission, a
 * `HistoryCache` for synchronized records. Handlers are async and are
 * driven to completion by main.rs on a current-thread runtime; they
 * return the process exit code so partial batch failures can surface
 * as a distinct code without being errors.
 */

mod init;

pub use init::run_init_wizard;

use crate::api::{ApiClient, MethodCatalog};
use crate::batch::{BatchController, BatchJob};
use crate::cli_style::{self, Icons, Theme};
use crate::config::{ClientConfig, SortKey, SortOrder};
use crate::error::{Result, SqueezeError, EXIT_FATAL, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::export;
use crate::history::HistoryCache;
use crate::stats::compute_statistics;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Submit one batch and render the per-file outcomes and totals.
///
/// Returns `EXIT_PARTIAL` when some files failed while the batch itself
/// completed; a transport failure or a missing local file aborts with an
/// error instead.
pub async fn compress(config: &ClientConfig, files: Vec<PathBuf>) -> Result<i32> {
    let client = ApiClient::new(config)?;
    let job = BatchJob::from_config(files, config);

    cli_style::section_header("Compressing");
    println!(
        "  {} file(s) {} {} ({}, quality {})",
        Theme::value(job.files.len()),
        Icons::ARROW_RIGHT,
        Theme::value(&config.service_url),
        Theme::value(job.method),
        Theme::value(job.quality),
    );
    println!();

    let spinner = progress_spinner(config, "Uploading batch...");

    let controller = BatchController::new();
    let submitted = controller.submit(&client, &job).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let output = submitted?;

    println!("{}", cli_style::outcome_table(&output.outcomes));
    println!();
    println!("{}", cli_style::summary_table(&output.summary));

    // Totals over successful outcomes only
    println!(
        "\n  {} {} {} ({:.2}% reduction)",
        Theme::bold(cli_style::format_bytes(output.summary.total_original)),
        Theme::muted(Icons::ARROW_RIGHT),
        Theme::bold(cli_style::format_bytes(output.summary.total_compressed)),
        output.summary.reduction_percent(),
    );

    if let Some(message) = &output.message {
        println!();
        cli_style::print_success(message);
    }

    // The trailing refresh mirrors the server-side view but must not
    // turn a finished batch into a failure.
    let mut cache = HistoryCache::new();
    match cache.refresh(&client, config.sort_by, config.order).await {
        Ok(()) => {
            println!(
                "  {}",
                Theme::muted(format!(
                    "History now holds {} record(s)",
                    cache.total_records()
                ))
            );
        }
        Err(e) => warn!(error = %e, "post-batch history refresh failed"),
    }

    if output.summary.failed > 0 {
        println!();
        cli_style::print_warning(&format!(
            "{} of {} file(s) failed",
            output.summary.failed,
            output.outcomes.len()
        ));
        return Ok(EXIT_PARTIAL);
    }

    Ok(EXIT_SUCCESS)
}

/// Refresh the history cache and render the synchronized table.
pub async fn history(config: &ClientConfig, sort_by: SortKey, order: SortOrder) -> Result<i32> {
    let client = ApiClient::new(config)?;
    let mut cache = HistoryCache::new();
    cache.refresh(&client, sort_by, order).await?;

    cli_style::section_header("Compression History");

    if cache.is_empty() {
        cli_style::print_info("History is empty.");
        return Ok(EXIT_SUCCESS);
    }

    println!("{}", cli_style::history_table(cache.records()));
    println!(
        "  {}",
        Theme::muted(format!(
            "{} record(s), sorted by {} ({})",
            cache.total_records(),
            sort_by.as_str(),
            order.as_str()
        ))
    );

    Ok(EXIT_SUCCESS)
}

/// Fetch aggregate statistics, falling back to a local reduction over a
/// fresh cache when the endpoint itself is unreachable.
pub async fn stats(config: &ClientConfig) -> Result<i32> {
    let client = ApiClient::new(config)?;

    cli_style::section_header("Aggregate Statistics");

    let statistics = match client.fetch_statistics().await {
        Ok(statistics) => statistics,
        Err(e) if e.is_transient() => {
            warn!(error = %e, "statistics endpoint failed, reducing locally");
            cli_style::print_warning("Statistics endpoint unreachable, computing from history.");
            let mut cache = HistoryCache::new();
            cache.refresh(&client, config.sort_by, config.order).await?;
            compute_statistics(cache.records())
        }
        Err(e) => return Err(SqueezeError::Api(e)),
    };

    let items = [
        ("Total Files", statistics.total_files.to_string()),
        (
            "Total Original Size",
            cli_style::format_bytes(statistics.total_original_size),
        ),
        (
            "Total Compressed Size",
            cli_style::format_bytes(statistics.total_compressed_size),
        ),
        (
            "Average Ratio",
            format!("{:.2}%", statistics.average_compression_ratio),
        ),
        (
            "Best Ratio",
            format!("{:.2}%", statistics.best_compression_ratio),
        ),
    ];
    println!("{}", cli_style::stats_table(&items));

    Ok(EXIT_SUCCESS)
}

/// Refresh the cache and write the CSV artifact.
pub async fn export_csv(config: &ClientConfig, path: &Path) -> Result<i32> {
    let client = ApiClient::new(config)?;
    let mut cache = HistoryCache::new();
    cache.refresh(&client, config.sort_by, config.order).await?;

    let csv = export::to_csv(cache.records())?;
    std::fs::write(path, &csv)?;

    cli_style::print_success(&format!(
        "Exported {} record(s) to {}",
        cache.len(),
        path.display()
    ));

    Ok(EXIT_SUCCESS)
}

/// Refresh the cache and render the PDF report, chart included unless the
/// caller opted out or the history is empty.
pub async fn export_report(config: &ClientConfig, path: &Path, with_chart: bool) -> Result<i32> {
    let client = ApiClient::new(config)?;
    let mut cache = HistoryCache::new();
    cache.refresh(&client, config.sort_by, config.order).await?;

    if cache.is_empty() {
        return Err(export::ExportError::EmptyHistory.into());
    }

    // Statistics are decorative in the report; render without the block
    // when the endpoint fails rather than losing the whole artifact.
    let statistics = match client.fetch_statistics().await {
        Ok(statistics) => Some(statistics),
        Err(e) => {
            warn!(error = %e, "statistics unavailable, report omits the summary block");
            None
        }
    };

    let chart = if with_chart {
        export::render_chart(cache.records(), config.theme)?
    } else {
        None
    };

    let layout = export::write_report(path, cache.records(), statistics.as_ref(), chart.as_ref())?;

    cli_style::print_success(&format!(
        "Exported {} record(s) across {} page(s) to {}",
        cache.len(),
        layout.pages,
        path.display()
    ));

    Ok(EXIT_SUCCESS)
}

/// Delete the entire server-side history after confirmation.
pub async fn clear(config: &ClientConfig, yes: bool) -> Result<i32> {
    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Delete the entire compression history?")
            .default(false)
            .interact()
            .map_err(|e| SqueezeError::Other(format!("confirmation prompt failed: {}", e)))?;
        if !confirmed {
            println!("{}", Theme::muted("History left untouched."));
            return Ok(EXIT_SUCCESS);
        }
    }

    let client = ApiClient::new(config)?;
    let mut cache = HistoryCache::new();
    let ack = cache.clear_via(&client).await?;

    cli_style::print_success(&ack.message);
    println!(
        "  {}",
        Theme::muted(format!("{} record(s) remain", cache.total_records()))
    );

    Ok(EXIT_SUCCESS)
}

/// List the methods the service offers, falling back to the built-in
/// catalog when the service cannot be reached.
pub async fn methods(config: &ClientConfig) -> Result<i32> {
    let client = ApiClient::new(config)?;

    cli_style::section_header("Compression Methods");

    let catalog = match client.list_methods().await {
        Ok(catalog) => catalog,
        Err(e) if e.is_transient() => {
            warn!(error = %e, "method catalog unavailable, using fallback");
            cli_style::print_warning("Service unreachable, listing built-in methods.");
            MethodCatalog::fallback()
        }
        Err(e) => return Err(SqueezeError::Api(e)),
    };

    let rows: Vec<(&str, bool, &str)> = catalog
        .compression_methods
        .iter()
        .map(|(token, info)| (token.as_str(), info.available, info.name.as_str()))
        .collect();
    println!("{}", cli_style::method_table(&rows));

    Ok(EXIT_SUCCESS)
}

/// Probe the service and report its health and capabilities.
pub async fn status(config: &ClientConfig) -> Result<i32> {
    let client = ApiClient::new(config)?;

    cli_style::section_header("Service Status");
    println!(
        "  {} {}",
        Theme::muted("Endpoint:"),
        Theme::value(&config.service_url)
    );

    match client.test_connection().await {
        Ok(status) => {
            if status.is_healthy() {
                cli_style::print_success(&status.message);
            } else {
                cli_style::print_warning(&format!("{} ({})", status.message, status.status));
            }
            let huffman = if status.huffman_available {
                "available"
            } else {
                "unavailable"
            };
            println!(
                "  {} {}",
                Theme::muted("Huffman coding:"),
                Theme::value(huffman)
            );
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            // The probe reporting an unreachable service is its answer,
            // not a crash; surface a banner and a nonzero code.
            cli_style::print_error(
                &format!("Service unreachable: {}", e),
                Some("Check service_url in ~/.squeeze/squeeze.toml or start the service."),
            );
            Ok(EXIT_FATAL)
        }
    }
}

/// Build the in-flight spinner, honoring the progress toggle.
fn progress_spinner(config: &ClientConfig, message: &str) -> Option<ProgressBar> {
    if !config.show_progress {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}
