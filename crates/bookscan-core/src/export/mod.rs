//! Writing the catalog to disk.
//!
//! CSV and Excel carry the six fixed columns
//! `timestamp, barcode, type, title, author, publisher`; JSON and JSONL carry
//! the same field names.

mod json;
mod sheet;

pub use json::{JsonLayout, JsonWriter};
pub use sheet::SHEET_NAME;

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::types::CatalogEntry;

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
    Jsonl,
}

impl ExportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "excel" => Some(Self::Xlsx),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::Jsonl),
            _ => None,
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub rows: usize,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exported {} items to {}", self.rows, self.path.display())
    }
}

/// Suggested file name for an export taken at `at`.
pub fn default_file_name(format: ExportFormat, at: NaiveDateTime) -> String {
    format!(
        "scanned_books_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Write `entries` to `path` in `format`.
///
/// An empty slice is rejected before any file is touched.
pub fn export(
    entries: &[CatalogEntry],
    path: &Path,
    format: ExportFormat,
) -> Result<ExportSummary, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    tracing::debug!("Exporting {} entries as {} to {:?}", entries.len(), format, path);

    match format {
        ExportFormat::Csv => sheet::write_csv(entries, path)?,
        ExportFormat::Xlsx => sheet::write_xlsx(entries, path)?,
        ExportFormat::Json | ExportFormat::Jsonl => {
            let layout = if format == ExportFormat::Json {
                JsonLayout::Array
            } else {
                JsonLayout::Lines
            };
            let file = File::create(path)?;
            let mut writer = JsonWriter::new(BufWriter::new(file), layout);
            writer.write_all(entries)?;
            writer.flush()?;
        }
    }

    tracing::info!("Exported {} items to {}", entries.len(), path.display());

    Ok(ExportSummary {
        path: path.to_path_buf(),
        format,
        rows: entries.len(),
    })
}

/// Like [`export`], inferring the format from the path's extension.
pub fn export_to_path(entries: &[CatalogEntry], path: &Path) -> Result<ExportSummary, ExportError> {
    let format = ExportFormat::from_path(path).ok_or_else(|| ExportError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    export(entries, path, format)
}
