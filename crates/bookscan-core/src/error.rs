//! Error types for the Bookscan pipeline.
//!
//! Errors are grouped by the part of the system that raised them so callers can
//! tell a missing camera apart from a failed lookup or an unwritable export path.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while opening or reading a frame source.
#[derive(Error, Debug)]
pub enum CameraError {
    /// No device index yielded a readable frame
    #[error("No camera found (probed {probed} device indices). Please check camera connection.")]
    NotFound { probed: u32 },

    /// A device could not be opened
    #[error("Failed to open camera {index}: {message}")]
    Open { index: u32, message: String },

    /// The device was open but returned no frame
    #[error("Camera read failed: {message}")]
    ReadFailed { message: String },

    /// A capture was requested with no camera attached to the session
    #[error("Camera is not started")]
    NotStarted,

    /// A still-image source could not be opened or read
    #[error("Cannot read image source {path}: {message}")]
    Still { path: PathBuf, message: String },

    /// Live capture was not compiled in
    #[error("Live camera capture is not available in this build (enable the `native-camera` feature)")]
    Unavailable,
}

/// Errors raised inside the scan pipeline.
///
/// None of these escape `ScanPipeline::process`; they are logged and turned
/// into placeholder fields or a zero-barcode result.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Barcode decoding failed for the frame
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// A metadata source failed
    #[error("{source_name} lookup failed: {message}")]
    Lookup {
        source_name: String,
        message: String,
        /// HTTP status code, when the failure was a non-success response
        status_code: Option<u16>,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },
}

/// Errors raised by the export writer.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The catalog is empty; no file was written
    #[error("No books to export.")]
    NothingToExport,

    /// Unknown export format name or extension
    #[error("Unsupported export format for {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Filesystem failure (permissions, missing directory, locked file)
    #[error("Export failed: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer failure
    #[error("Export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook writer failure
    #[error("Export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON writer failure
    #[error("Export failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
