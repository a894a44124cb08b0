//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Camera probing and preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device indices probed are `0..max_probe_index`
    pub max_probe_index: u32,

    /// Requested capture width (best-effort)
    pub width: u32,

    /// Requested capture height (best-effort)
    pub height: u32,

    /// Preview refresh rate
    pub preview_fps: u32,

    /// Preview frames are scaled to fit inside this box
    pub preview_width: u32,
    pub preview_height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            max_probe_index: 10,
            width: 1920,
            height: 1080,
            preview_fps: 30,
            preview_width: 400,
            preview_height: 300,
        }
    }
}

/// Scan trigger and decode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Minimum interval between two accepted scan requests
    pub cooldown_ms: u64,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 1000,
            decode_timeout_ms: 5000,
        }
    }
}

/// Metadata lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// When false, ISBNs are recorded with placeholder fields only
    pub enabled: bool,

    /// Per-request timeout in milliseconds (must stay under 10s)
    pub timeout_ms: u64,

    /// User-Agent sent to both services
    pub user_agent: String,

    /// Primary service
    pub open_library: OpenLibraryConfig,

    /// Secondary service
    pub google_books: GoogleBooksConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 5000,
            user_agent: format!("bookscan/{}", env!("CARGO_PKG_VERSION")),
            open_library: OpenLibraryConfig::default(),
            google_books: GoogleBooksConfig::default(),
        }
    }
}

/// Open Library configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenLibraryConfig {
    /// API base URL
    pub base_url: String,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
        }
    }
}

/// Google Books configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleBooksConfig {
    /// API base URL
    pub base_url: String,

    /// Optional API key (supports ${ENV_VAR} syntax). Empty means anonymous.
    pub api_key: String,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com".to_string(),
            api_key: String::new(),
        }
    }
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default export format ("csv", "xlsx", "json" or "jsonl")
    pub format: String,

    /// Directory suggested for exported files
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: "csv".to_string(),
            dir: "~".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
