/*!
 * Error types for Squeeze
 */

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::api::ApiError;
use crate::export::ExportError;

pub type Result<T> = std::result::Result<T, SqueezeError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_INPUT: i32 = 3;

#[derive(Debug)]
pub enum SqueezeError {
    /// Batch submitted with no files selected
    EmptyBatch,

    /// Selected input file not found
    FileNotFound(PathBuf),

    /// User input rejected before any request was made
    InvalidInput(String),

    /// I/O error
    Io(io::Error),

    /// Configuration error
    Config(String),

    /// Compression service error (transport, service-reported, or malformed payload)
    Api(ApiError),

    /// Export artifact error
    Export(ExportError),

    /// Generic error with message
    Other(String),
}

impl SqueezeError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // Input errors: rejected before any request was made
            SqueezeError::EmptyBatch
            | SqueezeError::FileNotFound(_)
            | SqueezeError::InvalidInput(_) => EXIT_INPUT,
            // Refusing to export an empty history is a user-input error too
            SqueezeError::Export(ExportError::EmptyHistory) => EXIT_INPUT,
            // Everything else aborts the command
            _ => EXIT_FATAL,
        }
    }

    /// Check if this error is fatal (retrying the same command cannot help)
    pub fn is_fatal(&self) -> bool {
        match self {
            SqueezeError::EmptyBatch => true,
            SqueezeError::FileNotFound(_) => true,
            SqueezeError::InvalidInput(_) => true,
            SqueezeError::Config(_) => true,
            SqueezeError::Export(_) => true,

            SqueezeError::Io(err) => !Self::is_io_transient(err),
            SqueezeError::Api(err) => !err.is_transient(),
            SqueezeError::Other(_) => false,
        }
    }

    /// Check if this error is transient (temporary, worth retrying)
    pub fn is_transient(&self) -> bool {
        match self {
            SqueezeError::Io(io_err) => Self::is_io_transient(io_err),
            SqueezeError::Api(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Check if an I/O error is transient
    fn is_io_transient(io_err: &io::Error) -> bool {
        use io::ErrorKind::*;
        matches!(
            io_err.kind(),
            ConnectionRefused
                | ConnectionReset
                | ConnectionAborted
                | NotConnected
                | BrokenPipe
                | TimedOut
                | Interrupted
                | WouldBlock
        )
    }

    /// Check if this error means the compression service could not be reached
    pub fn is_network_error(&self) -> bool {
        match self {
            SqueezeError::Io(io_err) => {
                use io::ErrorKind::*;
                matches!(
                    io_err.kind(),
                    ConnectionRefused
                        | ConnectionReset
                        | ConnectionAborted
                        | NotConnected
                        | BrokenPipe
                        | TimedOut
                )
            }
            SqueezeError::Api(err) => err.is_connection(),
            _ => false,
        }
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> ErrorCategory {
        match self {
            SqueezeError::EmptyBatch
            | SqueezeError::FileNotFound(_)
            | SqueezeError::InvalidInput(_) => ErrorCategory::Validation,
            SqueezeError::Io(_) => ErrorCategory::IoError,
            SqueezeError::Config(_) => ErrorCategory::Configuration,
            SqueezeError::Api(err) => match err {
                ApiError::Connection(_) | ApiError::Timeout(_) | ApiError::Request(_) => {
                    ErrorCategory::Network
                }
                ApiError::Service { .. } => ErrorCategory::Service,
                ApiError::MalformedResponse(_) => ErrorCategory::Protocol,
                ApiError::InvalidEndpoint(_) => ErrorCategory::Configuration,
                ApiError::Io(_) => ErrorCategory::IoError,
            },
            SqueezeError::Export(_) => ErrorCategory::Export,
            SqueezeError::Other(_) => ErrorCategory::Unknown,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input rejected before submission
    Validation,
    /// I/O operation errors
    IoError,
    /// Configuration errors
    Configuration,
    /// Transport errors (service unreachable, timeout)
    Network,
    /// Errors reported by the compression service
    Service,
    /// Responses that do not match the wire contract
    Protocol,
    /// CSV/report artifact errors
    Export,
    /// Uncategorized errors
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Service => write!(f, "service"),
            ErrorCategory::Protocol => write!(f, "protocol"),
            ErrorCategory::Export => write!(f, "export"),
            ErrorCategory::Unknown => write!(f, "unknown"),
        }
    }
}

impl fmt::Display for SqueezeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqueezeError::EmptyBatch => {
                write!(f, "No files selected for compression")
            }
            SqueezeError::FileNotFound(path) => {
                write!(f, "File not found: {}", path.display())
            }
            SqueezeError::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            SqueezeError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            SqueezeError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            SqueezeError::Api(err) => {
                write!(f, "{}", err)
            }
            SqueezeError::Export(err) => {
                write!(f, "{}", err)
            }
            SqueezeError::Other(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for SqueezeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SqueezeError::Io(err) => Some(err),
            SqueezeError::Api(err) => Some(err),
            SqueezeError::Export(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SqueezeError {
    fn from(err: io::Error) -> Self {
        SqueezeError::Io(err)
    }
}

impl From<ApiError> for SqueezeError {
    fn from(err: ApiError) -> Self {
        SqueezeError::Api(err)
    }
}

impl From<ExportError> for SqueezeError {
    fn from(err: ExportError) -> Self {
        SqueezeError::Export(err)
    }
}
