//! Bookscan Core - barcode-to-catalog pipeline for document cameras.
//!
//! Captures frames from a camera (or still images), decodes every barcode in
//! them, looks up ISBNs against public bibliographic services, and keeps a
//! deduplicated catalog that can be exported to CSV, Excel, JSON or JSONL.
//!
//! # Architecture
//!
//! ```text
//! Frame → Decode (zbar) → Dedupe → ISBN? → Lookup (Open Library → Google Books) → Catalog → Export
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookscan_core::{Catalog, Config, ScanPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = ScanPipeline::from_config(&config)?;
//!     let mut catalog = Catalog::new();
//!
//!     let frame = image::open("./shelf.jpg")?;
//!     let report = pipeline.process(frame, &mut catalog).await;
//!     println!("{}", report.outcome().message());
//!     Ok(())
//! }
//! ```

pub mod camera;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod isbn;
pub mod lookup;
pub mod pipeline;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use camera::{CameraHandle, FrameSource, PreviewWorker, StillSource};
pub use catalog::Catalog;
pub use config::Config;
pub use error::{CameraError, ConfigError, ExportError, PipelineError, PipelineResult};
pub use export::{export, ExportFormat, ExportSummary};
pub use isbn::{classify, is_isbn, IsbnKind};
pub use lookup::LookupResolver;
pub use pipeline::{BarcodeDecoder, ScanPipeline};
pub use session::{ScanEvent, ScanGate, ScanPermit, ScanSession};
pub use types::{
    BookInfo, CatalogEntry, CatalogStats, DecodedBarcode, ScanOutcome, ScanReport, Severity,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
