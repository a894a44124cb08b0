//! Core data types for the Bookscan pipeline.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::isbn;

/// Placeholder used when no title is known.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Placeholder used when no author is known.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Placeholder used when no publisher is known.
pub const UNKNOWN_PUBLISHER: &str = "Unknown Publisher";

/// Column names in export order.
pub const EXPORT_COLUMNS: [&str; 6] = ["timestamp", "barcode", "type", "title", "author", "publisher"];

/// One catalog row: a unique decoded payload plus whatever metadata was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Local capture time, second precision
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,

    /// Raw decoded payload
    pub barcode: String,

    /// Decoder-reported symbol type ("EAN13", "CODE128", ...)
    #[serde(rename = "type")]
    pub symbology: String,

    pub title: String,
    pub author: String,
    pub publisher: String,
}

impl CatalogEntry {
    /// Build an entry stamped with the current local time.
    pub fn new(barcode: DecodedBarcode, info: Option<BookInfo>) -> Self {
        Self::at(now_to_second(), barcode, info)
    }

    /// Build an entry with an explicit timestamp.
    pub fn at(timestamp: NaiveDateTime, barcode: DecodedBarcode, info: Option<BookInfo>) -> Self {
        let info = info.unwrap_or_default();
        Self {
            timestamp,
            barcode: barcode.payload,
            symbology: barcode.symbology,
            title: info.title,
            author: info.author,
            publisher: info.publisher,
        }
    }

    /// Whether the barcode is shaped like an ISBN.
    pub fn is_isbn(&self) -> bool {
        isbn::is_isbn(&self.barcode)
    }

    /// Barcode as shown in the results table: bare ISBNs, `TYPE: payload` otherwise.
    pub fn display_barcode(&self) -> String {
        if self.is_isbn() {
            self.barcode.clone()
        } else {
            format!("{}: {}", self.symbology, self.barcode)
        }
    }

    /// Timestamp rendered the way it is exported.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(timestamp_format::FORMAT).to_string()
    }

    /// Fields in export column order.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.timestamp_string(),
            self.barcode.clone(),
            self.symbology.clone(),
            self.title.clone(),
            self.author.clone(),
            self.publisher.clone(),
        ]
    }
}

/// Current local time truncated to whole seconds.
pub fn now_to_second() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Book metadata returned by a lookup source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfo {
    pub title: String,
    pub author: String,
    pub publisher: String,
}

impl Default for BookInfo {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            publisher: UNKNOWN_PUBLISHER.to_string(),
        }
    }
}

/// A single barcode found in a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedBarcode {
    /// Payload text
    pub payload: String,
    /// Symbol type reported by the decoder
    pub symbology: String,
}

impl DecodedBarcode {
    pub fn new(payload: impl Into<String>, symbology: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            symbology: symbology.into(),
        }
    }
}

/// Result of running one frame through the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Entries appended to the catalog, in decode order
    pub new_entries: Vec<CatalogEntry>,

    /// Payloads skipped because the catalog already had them
    pub duplicate_count: usize,

    /// Total payloads the decoder returned
    pub decoded_count: usize,

    /// The decoder itself failed (reported as a zero-barcode frame)
    pub decode_failed: bool,
}

impl ScanReport {
    /// Summarize the report for status display.
    pub fn outcome(&self) -> ScanOutcome {
        if self.decoded_count == 0 {
            ScanOutcome::NoBarcodes {
                decode_failed: self.decode_failed,
            }
        } else if !self.new_entries.is_empty() {
            ScanOutcome::Added(self.new_entries.len())
        } else {
            ScanOutcome::Duplicates(self.duplicate_count)
        }
    }
}

/// Status summary of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Nothing decoded in the frame
    NoBarcodes { decode_failed: bool },
    /// At least one new entry was added
    Added(usize),
    /// Everything decoded was already in the catalog
    Duplicates(usize),
}

impl ScanOutcome {
    /// Status message for the presentation layer.
    pub fn message(&self) -> String {
        match self {
            ScanOutcome::NoBarcodes {
                decode_failed: true,
            } => "Scan error occurred".to_string(),
            ScanOutcome::NoBarcodes { .. } => "No barcodes found".to_string(),
            ScanOutcome::Added(n) => format!("Added {n} book(s)!"),
            ScanOutcome::Duplicates(n) => format!("Found {n} duplicate(s)"),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ScanOutcome::NoBarcodes {
                decode_failed: true,
            } => Severity::Error,
            ScanOutcome::NoBarcodes { .. } => Severity::Warning,
            ScanOutcome::Added(_) => Severity::Success,
            ScanOutcome::Duplicates(_) => Severity::Info,
        }
    }
}

/// Status severity, used to pick an icon/colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Info,
    Error,
}

/// Running totals shown under the results table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// All entries
    pub total: usize,
    /// Entries whose barcode is shaped like an ISBN
    pub books: usize,
}

impl std::fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total Scanned: {} | Books Found: {}",
            self.total, self.books
        )
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
