/*!
 * Squeeze Init Command - First-Run Onboarding Wizard
 *
 * This module provides an interactive setup wizard that:
 * 1. Asks where the compression service lives
 * 2. Probes the service for reachability and capabilities
 * 3. Interviews the user about their use case
 * 4. Persists configuration to ~/.squeeze/squeeze.toml
 */

use crate::api::{ApiClient, ConnectionStatus};
use crate::config::{ClientConfig, ColorTheme, CompressionMethod};
use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

/// Run the interactive initialization wizard
pub fn run_init_wizard() -> Result<()> {
    print_welcome();

    // 1. Check for existing configuration
    let config_path = get_default_config_path()?;
    if config_path.exists()
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Existing configuration found. Overwrite?")
            .default(false)
            .interact()?
    {
        println!("\n{}", style("Configuration unchanged.").cyan());
        return Ok(());
    }

    // 2. Service location
    let service_url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Compression service URL")
        .default(ClientConfig::default().service_url)
        .interact_text()?;

    // 3. Service probe
    println!("\n{}", style("Probing compression service...").cyan());
    let status = probe_service(&service_url);
    match &status {
        Some(s) => {
            println!("  {} {}", style("✓").green().bold(), s.message);
            let huffman = if s.huffman_available {
                style("available").green().bold()
            } else {
                style("unavailable").yellow().bold()
            };
            println!("  Huffman coding: {}", huffman);
        }
        None => {
            println!(
                "  {} Service not reachable (the configuration will still be saved)",
                style("Warning:").yellow()
            );
        }
    }

    // 4. User Interview
    println!("\n{}", style("Configuration Setup").cyan().bold());
    let use_cases = &[
        "Local service (balanced defaults)",
        "Remote service (slow link, long timeouts)",
        "Lossless archival (Huffman coding)",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What is your primary use case?")
        .default(0)
        .items(use_cases)
        .interact()?;

    // 5. Configuration Synthesis
    let mut config = match selection {
        0 => ClientConfig::local_preset(),
        1 => ClientConfig::remote_preset(),
        2 => ClientConfig::lossless_preset(),
        _ => ClientConfig::default(),
    };
    config.service_url = service_url;

    // Apply capability adjustments if the probe answered
    if let Some(s) = &status {
        apply_probe_adjustments(&mut config, s);
    }

    // 6. Rendering preferences
    config.theme = if Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Render history charts with the dark theme?")
        .default(false)
        .interact()?
    {
        ColorTheme::Dark
    } else {
        ColorTheme::Light
    };

    let output_dir: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Output directory for compressed files (empty = service default)")
        .allow_empty(true)
        .default(String::new())
        .interact_text()?;
    if !output_dir.trim().is_empty() {
        config.output_dir = Some(PathBuf::from(output_dir.trim()));
    }

    // 7. Persistence
    let config_dir = config_path.parent().unwrap();
    fs::create_dir_all(config_dir)?;
    config
        .to_file(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to save configuration: {}", e))?;

    print_summary(&config_path, &config);

    Ok(())
}

/// Print welcome banner
fn print_welcome() {
    println!();
    println!(
        "{}",
        style("╔════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║    🗜 Welcome to Squeeze Setup         ║").cyan()
    );
    println!(
        "{}",
        style("╚════════════════════════════════════════╝").cyan()
    );
    println!();
    println!("This wizard will probe your compression service and create a configuration.");
}

/// Get the default configuration file path
fn get_default_config_path() -> Result<PathBuf> {
    ClientConfig::default_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Probe the service once, on a throwaway runtime. The wizard runs
/// before any logging is set up, so failures are folded into `None`.
fn probe_service(service_url: &str) -> Option<ConnectionStatus> {
    let candidate = ClientConfig {
        service_url: service_url.to_string(),
        connect_timeout_secs: 5,
        request_timeout_secs: 10,
        ..Default::default()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .ok()?;
    let client = ApiClient::new(&candidate).ok()?;
    runtime.block_on(client.test_connection()).ok()
}

/// Apply probe-based adjustments to the configuration
fn apply_probe_adjustments(config: &mut ClientConfig, status: &ConnectionStatus) {
    // Huffman cannot be the default when the service reports it missing
    if config.method == CompressionMethod::Huffman && !status.huffman_available {
        println!(
            "  {} Huffman coding is unavailable on this service, defaulting to JPEG",
            style("Note:").yellow()
        );
        config.method = CompressionMethod::Jpeg;
    }
}

/// Print configuration summary
fn print_summary(config_path: &Path, config: &ClientConfig) {
    println!();
    println!(
        "{}",
        style("╔════════════════════════════════════════╗").green()
    );
    println!(
        "{}",
        style("║    ✅ Configuration Saved              ║").green()
    );
    println!(
        "{}",
        style("╚════════════════════════════════════════╝").green()
    );
    println!();
    println!("  Location: {}", style(config_path.display()).cyan());
    println!();
    println!("  {}", style("Configuration Summary:").bold());
    println!("  ─────────────────────────");
    println!(
        "  Service URL:      {}",
        style(&config.service_url).yellow()
    );
    println!(
        "  Method:           {}",
        style(config.method.as_str()).yellow()
    );
    println!("  Quality:          {}", style(config.quality).yellow());
    println!(
        "  Aspect Ratio:     {}",
        style(config.aspect_ratio.as_str()).yellow()
    );
    println!(
        "  Save Previews:    {}",
        style(config.save_compressed).yellow()
    );
    println!(
        "  Request Timeout:  {}s",
        style(config.request_timeout_secs).yellow()
    );
    println!();
    println!("  {}", style("Next Steps:").bold());
    println!(
        "  1. Review the configuration: cat {}",
        config_path.display()
    );
    println!("  2. Run 'squeeze status' to verify the service is reachable");
    println!("  3. Run 'squeeze --help' to see available commands");
    println!();
}
