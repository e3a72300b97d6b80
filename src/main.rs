/*!
 * Squeeze CLI - Command Line Interface
 *
 * One subcommand per user-visible action of the compression client:
 * compress, history, stats, export, clear, methods, status, init.
 */

use clap::{Parser, Subcommand, ValueEnum};
use squeeze::{
    cli_style,
    commands,
    config::{AspectRatio, ClientConfig, CompressionMethod, LogLevel, SortKey, SortOrder},
    error::{Result, SqueezeError, EXIT_SUCCESS},
    logging,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squeeze")]
#[command(version, about = "Batch image compression client with history sync and deterministic exports", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (default: ~/.squeeze/squeeze.toml)
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Log level
    #[arg(long = "log-level", value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Write logs as JSON to this file instead of stdout
    #[arg(long = "log", value_name = "PATH", global = true)]
    log: Option<PathBuf>,

    /// Disable the progress spinner
    #[arg(long = "no-progress", global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a batch of images through the service
    Compress {
        /// Image files to upload
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,

        /// JPEG quality (1-100)
        #[arg(short = 'q', long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// Target aspect ratio
        #[arg(short = 'a', long, value_enum)]
        aspect: Option<AspectArg>,

        /// Compression method
        #[arg(short = 'm', long, value_enum)]
        method: Option<MethodArg>,

        /// Directory for compressed output (forwarded to the service)
        #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Do not write decoded JPEG payloads locally
        #[arg(long = "no-save")]
        no_save: bool,
    },

    /// Show the synchronized compression history
    History {
        /// Sort key
        #[arg(long = "sort-by", value_enum)]
        sort_by: Option<SortKeyArg>,

        /// Sort direction
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },

    /// Show aggregate statistics over the full history
    Stats,

    /// Export the history to a file
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },

    /// Delete the entire server-side history
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List compression methods offered by the service
    Methods,

    /// Probe the service and report its health
    Status,

    /// Interactive first-run configuration wizard
    Init,
}

#[derive(Subcommand)]
enum ExportFormat {
    /// Write the history as CSV
    Csv {
        /// Destination file
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Render the paginated PDF report
    Report {
        /// Destination file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Leave the history chart out of the report
        #[arg(long = "no-chart")]
        no_chart: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    /// Lossy JPEG re-encoding
    Jpeg,
    /// Lossless Huffman coding
    Huffman,
}

impl From<MethodArg> for CompressionMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Jpeg => CompressionMethod::Jpeg,
            MethodArg::Huffman => CompressionMethod::Huffman,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AspectArg {
    /// Keep the source dimensions
    Original,
    /// 4:3
    #[value(name = "4:3")]
    Standard,
    /// 16:9
    #[value(name = "16:9")]
    Widescreen,
    /// 1:1
    #[value(name = "1:1")]
    Square,
}

impl From<AspectArg> for AspectRatio {
    fn from(arg: AspectArg) -> Self {
        match arg {
            AspectArg::Original => AspectRatio::Original,
            AspectArg::Standard => AspectRatio::Standard,
            AspectArg::Widescreen => AspectRatio::Widescreen,
            AspectArg::Square => AspectRatio::Square,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKeyArg {
    /// Record timestamp
    Date,
    /// Original file size
    Size,
    /// Compression ratio
    CompressionRatio,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Date => SortKey::Date,
            SortKeyArg::Size => SortKey::Size,
            SortKeyArg::CompressionRatio => SortKey::CompressionRatio,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Ascending
    Asc,
    /// Descending (newest/largest first)
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            cli_style::print_error(&e.to_string(), None);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Load config file once, then let CLI flags override it
    let mut config = load_config(cli.config.as_ref());

    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.verbose {
        config.verbose = true;
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    if cli.no_progress {
        config.show_progress = false;
    }

    // The wizard writes a fresh config; validating or logging against the
    // current one would be premature.
    if !matches!(cli.command, Commands::Init) {
        config.validate().map_err(SqueezeError::Config)?;

        if let Err(e) = logging::init_logging(&config) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }
    }

    handle_command(cli.command, config)
}

/// Load the configuration: an explicit path warns and falls back to
/// defaults on failure, the default path is used only when present.
fn load_config(explicit: Option<&PathBuf>) -> ClientConfig {
    if let Some(path) = explicit {
        return ClientConfig::from_file(path).unwrap_or_else(|e| {
            cli_style::print_warning(&format!("Failed to load config file: {}", e));
            ClientConfig::default()
        });
    }

    match ClientConfig::default_path() {
        Some(path) if path.exists() => ClientConfig::from_file(&path).unwrap_or_else(|e| {
            cli_style::print_warning(&format!("Failed to load config file: {}", e));
            ClientConfig::default()
        }),
        _ => ClientConfig::default(),
    }
}

fn handle_command(command: Commands, mut config: ClientConfig) -> Result<i32> {
    match command {
        Commands::Compress {
            files,
            quality,
            aspect,
            method,
            output_dir,
            no_save,
        } => {
            if let Some(q) = quality {
                config.quality = q;
            }
            if let Some(a) = aspect {
                config.aspect_ratio = a.into();
            }
            if let Some(m) = method {
                config.method = m.into();
            }
            if output_dir.is_some() {
                config.output_dir = output_dir;
            }
            if no_save {
                config.save_compressed = false;
            }
            block_on(commands::compress(&config, files))
        }

        Commands::History { sort_by, order } => {
            let sort_by = sort_by.map(SortKey::from).unwrap_or(config.sort_by);
            let order = order.map(SortOrder::from).unwrap_or(config.order);
            block_on(commands::history(&config, sort_by, order))
        }

        Commands::Stats => block_on(commands::stats(&config)),

        Commands::Export { format } => match format {
            ExportFormat::Csv { path } => block_on(commands::export_csv(&config, &path)),
            ExportFormat::Report { path, no_chart } => {
                block_on(commands::export_report(&config, &path, !no_chart))
            }
        },

        Commands::Clear { yes } => block_on(commands::clear(&config, yes)),

        Commands::Methods => block_on(commands::methods(&config)),

        Commands::Status => block_on(commands::status(&config)),

        Commands::Init => {
            commands::run_init_wizard().map_err(|e| SqueezeError::Other(e.to_string()))?;
            Ok(EXIT_SUCCESS)
        }
    }
}

/// Drive one async handler on a current-thread runtime.
fn block_on<T>(future: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SqueezeError::Other(format!("Failed to start async runtime: {}", e)))?;
    runtime.block_on(future)
}
