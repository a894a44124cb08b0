//! Frame scanning pipeline.
//!
//! - **decode**: find barcode symbols in a frame, off the async runtime
//! - **discovery**: find still images on disk
//! - **processor**: dedupe against the catalog and look up ISBN metadata

pub mod decode;
pub mod discovery;
pub mod processor;

pub use decode::{default_decoder, BarcodeDecoder, FrameDecoder};
#[cfg(feature = "zbar")]
pub use decode::ZbarDecoder;
pub use discovery::{discover_images, SUPPORTED_EXTENSIONS};
pub use processor::ScanPipeline;
