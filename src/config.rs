/*!
 * Configuration types for Squeeze
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Main configuration for the compression service client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the compression service
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Request timeout in seconds for batch submissions
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Default JPEG quality (1-100)
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Default target aspect ratio
    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    /// Default compression method
    #[serde(default)]
    pub method: CompressionMethod,

    /// Default history sort key
    #[serde(default)]
    pub sort_by: SortKey,

    /// Default history sort order
    #[serde(default)]
    pub order: SortOrder,

    /// Directory for compressed output, forwarded to the service per request
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Write JPEG payloads returned by the service to the output directory
    #[serde(default = "default_true")]
    pub save_compressed: bool,

    /// Color theme for chart rendering
    #[serde(default)]
    pub theme: ColorTheme,

    /// Show progress spinner while a batch is in flight
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stdout)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            quality: default_quality(),
            aspect_ratio: AspectRatio::Original,
            method: CompressionMethod::Jpeg,
            sort_by: SortKey::Date,
            order: SortOrder::Desc,
            output_dir: None,
            save_compressed: true,
            theme: ColorTheme::Light,
            show_progress: true,
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
        }
    }
}

/// Compression method offered by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// Lossy JPEG re-encoding
    #[default]
    Jpeg,

    /// Lossless Huffman coding
    Huffman,
}

impl CompressionMethod {
    /// Wire token used in request paths and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMethod::Jpeg => "jpeg",
            CompressionMethod::Huffman => "huffman",
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target aspect ratio applied by the service during JPEG compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    /// Keep the source dimensions
    #[default]
    #[serde(rename = "original")]
    Original,

    /// 4:3
    #[serde(rename = "4:3")]
    Standard,

    /// 16:9
    #[serde(rename = "16:9")]
    Widescreen,

    /// 1:1
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// Wire token used in request paths and history records
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Original => "original",
            AspectRatio::Standard => "4:3",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Square => "1:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// History sort key, forwarded verbatim to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Sort by record timestamp
    #[default]
    Date,

    /// Sort by original file size
    Size,

    /// Sort by compression ratio
    CompressionRatio,
}

impl SortKey {
    /// Query-string token understood by the service
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Size => "size",
            SortKey::CompressionRatio => "compression_ratio",
        }
    }
}

/// History sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,

    /// Descending (newest/largest first)
    #[default]
    Desc,
}

impl SortOrder {
    /// Query-string token understood by the service
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Color theme applied to the history chart raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// White background, saturated series colors
    #[default]
    Light,

    /// Dark background, muted series colors
    Dark,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_service_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_quality() -> u8 {
    80
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default configuration file location (~/.squeeze/squeeze.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".squeeze").join("squeeze.toml"))
    }

    /// Check that the configuration is usable before any request is made
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.service_url)
            .map_err(|e| format!("invalid service_url '{}': {}", self.service_url, e))?;

        if self.quality == 0 || self.quality > 100 {
            return Err(format!("quality must be 1-100, got {}", self.quality));
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Configuration for a service running on this machine
    pub fn local_preset() -> Self {
        Self::default()
    }

    /// Configuration for a service on another host (slower links, longer timeouts)
    pub fn remote_preset() -> Self {
        Self {
            request_timeout_secs: 300,
            connect_timeout_secs: 30,
            ..Default::default()
        }
    }

    /// Configuration for lossless archival work (outputs stay on the service host)
    pub fn lossless_preset() -> Self {
        Self {
            method: CompressionMethod::Huffman,
            save_compressed: false,
            ..Default::default()
        }
    }
}
