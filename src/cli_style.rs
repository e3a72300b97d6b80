/*!
 * Squeeze CLI Style System
 *
 * Unified styling utilities for consistent CLI output.
 * Provides tables, boxes, and themed text formatting.
 */

use crate::batch::{BatchSummary, PerFileOutcome};
use crate::history::HistoryRecord;
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::{style, StyledObject};

// ============================================================================
// THEME COLORS
// ============================================================================

/// Brand colors for consistent styling
pub struct Theme;

impl Theme {
    /// Primary accent color (cyan/blue)
    pub fn primary<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan()
    }

    /// Success color (green)
    pub fn success<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    /// Warning color (yellow)
    pub fn warning<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).yellow()
    }

    /// Error color (red)
    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red()
    }

    /// Muted/secondary text (dim)
    pub fn muted<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }

    /// Bold text
    pub fn bold<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).bold()
    }

    /// Header style (bold cyan)
    pub fn header<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan().bold()
    }

    /// Value/number highlight (bold white)
    pub fn value<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).white().bold()
    }
}

// ============================================================================
// ICONS
// ============================================================================

/// Unicode icons for visual feedback
pub struct Icons;

impl Icons {
    // Status icons
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const INFO: &'static str = "ℹ";

    // Feature icons
    pub const CLAMP: &'static str = "🗜";
    pub const IMAGE: &'static str = "🖼";
    pub const GLOBE: &'static str = "🌐";
    pub const FOLDER: &'static str = "📁";
    pub const STATS: &'static str = "📊";
    pub const CLOCK: &'static str = "⏱";
    pub const SPARKLE: &'static str = "✨";

    // Arrow indicators
    pub const ARROW_RIGHT: &'static str = "→";
    pub const BULLET: &'static str = "•";
}

// ============================================================================
// BOX DRAWING
// ============================================================================

/// Draw a styled header box
pub fn header_box(title: &str, subtitle: Option<&str>) {
    let width = 56;
    let top = format!("╔{}╗", "═".repeat(width));
    let bottom = format!("╚{}╝", "═".repeat(width));

    println!("{}", Theme::primary(&top));

    // Center the title
    let title_display = format!("{} {}", Icons::CLAMP, title);
    let padding = (width - title_display.chars().count()) / 2;
    println!(
        "{}{}{}{}{}",
        Theme::primary("║"),
        " ".repeat(padding),
        Theme::header(&title_display),
        " ".repeat(width - padding - title_display.chars().count()),
        Theme::primary("║")
    );

    if let Some(sub) = subtitle {
        let sub_padding = (width - sub.len()) / 2;
        println!(
            "{}{}{}{}{}",
            Theme::primary("║"),
            " ".repeat(sub_padding),
            Theme::muted(sub),
            " ".repeat(width - sub_padding - sub.len()),
            Theme::primary("║")
        );
    }

    println!("{}", Theme::primary(&bottom));
}

/// Draw a section header with a line
pub fn section_header(title: &str) {
    let line_len = 50 - title.len().min(40);
    println!(
        "\n{} {}",
        Theme::header(title),
        Theme::muted("─".repeat(line_len))
    );
}

// ============================================================================
// TABLES
// ============================================================================

/// Create a styled data table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a minimal table (no outer borders)
pub fn create_minimal_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a key-value table for stats
pub fn stats_table(items: &[(&str, String)]) -> Table {
    let mut table = create_minimal_table();

    for (key, value) in items {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(value)
                .fg(Color::White)
                .add_attribute(Attribute::Bold),
        ]);
    }

    table
}

/// Create a compression method availability table
pub fn method_table(items: &[(&str, bool, &str)]) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        Cell::new("Method")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Status")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Details")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);

    for (method, available, details) in items {
        let status = if *available {
            Cell::new(format!("{} Available", Icons::SUCCESS)).fg(Color::Green)
        } else {
            Cell::new(format!("{} Not Available", Icons::ERROR)).fg(Color::Red)
        };

        table.add_row(vec![
            Cell::new(method),
            status,
            Cell::new(details).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Create a per-file outcome table for one finished batch
pub fn outcome_table(outcomes: &[PerFileOutcome]) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        Cell::new("File")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Original")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Compressed")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Ratio")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Details")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);

    for outcome in outcomes {
        match outcome {
            PerFileOutcome::Jpeg(jpeg) => {
                let detail = match (jpeg.original_dimensions, jpeg.final_dimensions) {
                    (Some((ow, oh)), Some((fw, fh))) => {
                        format!("{}x{} {} {}x{}", ow, oh, Icons::ARROW_RIGHT, fw, fh)
                    }
                    _ => String::new(),
                };
                table.add_row(vec![
                    Cell::new(&jpeg.filename),
                    Cell::new(format_bytes(jpeg.original_size)),
                    Cell::new(format_bytes(jpeg.compressed_size)).fg(Color::Green),
                    Cell::new(format!("{:.2}%", jpeg.compression_ratio))
                        .fg(Color::Cyan)
                        .add_attribute(Attribute::Bold),
                    Cell::new(detail).fg(Color::DarkGrey),
                ]);
            }
            PerFileOutcome::Huffman(huffman) => {
                let detail = match (huffman.original_bits, huffman.compressed_bits) {
                    (Some(ob), Some(cb)) => {
                        format!("{} bits {} {} bits", ob, Icons::ARROW_RIGHT, cb)
                    }
                    _ => String::new(),
                };
                table.add_row(vec![
                    Cell::new(&huffman.filename),
                    Cell::new(format_bytes(huffman.original_size)),
                    Cell::new(format_bytes(huffman.compressed_size)).fg(Color::Green),
                    Cell::new(format!("{:.2}%", huffman.compression_ratio))
                        .fg(Color::Cyan)
                        .add_attribute(Attribute::Bold),
                    Cell::new(detail).fg(Color::DarkGrey),
                ]);
            }
            PerFileOutcome::Error(err) => {
                table.add_row(vec![
                    Cell::new(&err.filename),
                    Cell::new("-").fg(Color::DarkGrey),
                    Cell::new("-").fg(Color::DarkGrey),
                    Cell::new("-").fg(Color::DarkGrey),
                    Cell::new(&err.message)
                        .fg(Color::Red)
                        .add_attribute(Attribute::Bold),
                ]);
            }
        }
    }

    table
}

/// Create a batch summary table
pub fn summary_table(summary: &BatchSummary) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        Cell::new("Batch Summary")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);

    table.add_row(vec![
        Cell::new("Files Compressed"),
        Cell::new(summary.succeeded.to_string())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    if summary.failed > 0 {
        table.add_row(vec![
            Cell::new("Files Failed"),
            Cell::new(summary.failed.to_string())
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        ]);
    }

    table.add_row(vec![
        Cell::new("Total Original"),
        Cell::new(format_bytes(summary.total_original))
            .fg(Color::White)
            .add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("Total Compressed"),
        Cell::new(format_bytes(summary.total_compressed))
            .fg(Color::White)
            .add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("Space Saved"),
        Cell::new(format!("{:.2}%", summary.reduction_percent()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(format_duration(summary.duration_secs)).fg(Color::White),
    ]);

    table
}

/// Create a history table from synchronized records
pub fn history_table(records: &[HistoryRecord]) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        Cell::new("Filename")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Date")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Original")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Compressed")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Ratio")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Quality")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Method")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.filename),
            Cell::new(record.local_date()).fg(Color::DarkGrey),
            Cell::new(format_bytes(record.original_size)),
            Cell::new(format_bytes(record.compressed_size)).fg(Color::Green),
            Cell::new(format!("{:.2}%", record.compression_ratio)).fg(Color::Cyan),
            Cell::new(record.quality.to_string()),
            Cell::new(record.method().as_str()).fg(Color::DarkGrey),
        ]);
    }

    table
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Format bytes into human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f = bytes as f64;
    let base = 1024.0_f64;
    let exp = (bytes_f.ln() / base.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f / base.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.2} {}", value, UNITS[exp])
    }
}

/// Format duration into human-readable string
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs % 3600.0) / 60.0).floor();
        format!("{}h {}m", hours, mins)
    }
}

/// Print a styled error message with optional suggestion
pub fn print_error(message: &str, suggestion: Option<&str>) {
    eprintln!(
        "\n{} {}",
        Theme::error(format!("{} Error:", Icons::ERROR)),
        message
    );

    if let Some(hint) = suggestion {
        eprintln!(
            "  {} {}",
            Theme::muted(Icons::ARROW_RIGHT),
            Theme::muted(hint)
        );
    }
    eprintln!();
}

/// Print a styled warning message
pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        Theme::warning(Icons::WARNING.to_string()),
        Theme::warning(message)
    );
}

/// Print a styled success message
pub fn print_success(message: &str) {
    println!(
        "{} {}",
        Theme::success(Icons::SUCCESS.to_string()),
        Theme::success(message)
    );
}

/// Print a styled info message
pub fn print_info(message: &str) {
    println!("{} {}", Theme::primary(Icons::INFO.to_string()), message);
}

// ============================================================================
// BANNER
// ============================================================================

/// Print the Squeeze welcome banner
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");

    println!();
    println!(
        "{}",
        Theme::primary("  ╭─────────────────────────────────────────────────╮")
    );
    println!(
        "{}       {}          {}",
        Theme::primary("  │"),
        Theme::header("🗜 S Q U E E Z E"),
        Theme::primary("│")
    );
    println!(
        "{}    {}    {}",
        Theme::primary("  │"),
        Theme::muted("Batch Image Compression Client"),
        Theme::primary("│")
    );
    println!(
        "{}                  {}                   {}",
        Theme::primary("  │"),
        Theme::muted(format!("v{}", version)),
        Theme::primary("│")
    );
    println!(
        "{}",
        Theme::primary("  ╰─────────────────────────────────────────────────╯")
    );
    println!();
}

// ============================================================================
// TESTS
// ============================================================================
