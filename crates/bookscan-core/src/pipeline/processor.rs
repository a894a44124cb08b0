//! Scan orchestration: decode a frame, dedupe, look up ISBNs, record entries.

use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::PipelineError;
use crate::isbn;
use crate::lookup::LookupResolver;
use crate::types::{CatalogEntry, DecodedBarcode, ScanReport};

use super::decode::{default_decoder, BarcodeDecoder, FrameDecoder};

/// Turns one captured frame into new catalog entries.
#[derive(Clone)]
pub struct ScanPipeline {
    decoder: FrameDecoder,
    resolver: LookupResolver,
}

impl ScanPipeline {
    pub fn new(decoder: Arc<dyn BarcodeDecoder>, resolver: LookupResolver, config: &Config) -> Self {
        Self {
            decoder: FrameDecoder::new(decoder, &config.scan),
            resolver,
        }
    }

    /// Pipeline with the built-in decoder and the configured lookup sources.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let resolver = LookupResolver::from_config(&config.lookup)?;
        Ok(Self::new(default_decoder(), resolver, config))
    }

    pub fn resolver(&self) -> &LookupResolver {
        &self.resolver
    }

    /// Scan a frame and append every previously unseen barcode to the catalog.
    ///
    /// Never fails: a decode error yields a report with `decode_failed` set and
    /// lookup errors become placeholder metadata. Payloads repeated within the
    /// same frame count as duplicates after their first occurrence.
    pub async fn process(&self, frame: DynamicImage, catalog: &mut Catalog) -> ScanReport {
        let start = Instant::now();
        let (width, height) = (frame.width(), frame.height());

        let barcodes = match self.decoder.decode(frame).await {
            Ok(barcodes) => barcodes,
            Err(e) => {
                tracing::error!("Error scanning barcodes: {e}");
                return ScanReport {
                    decode_failed: true,
                    ..Default::default()
                };
            }
        };
        tracing::trace!("  Decode ({}): {:?}", self.decoder.name(), start.elapsed());

        let report = self.record(barcodes, catalog).await;

        tracing::debug!(
            "Scanned {}x{} frame in {:?}: {} decoded, {} new, {} duplicate",
            width,
            height,
            start.elapsed(),
            report.decoded_count,
            report.new_entries.len(),
            report.duplicate_count
        );
        report
    }

    /// Dedupe and enrich already-decoded barcodes, in decoder order.
    pub async fn record(&self, barcodes: Vec<DecodedBarcode>, catalog: &mut Catalog) -> ScanReport {
        let mut report = ScanReport {
            decoded_count: barcodes.len(),
            ..Default::default()
        };

        for barcode in barcodes {
            if catalog.contains(&barcode.payload) {
                tracing::debug!("Duplicate barcode {}", barcode.payload);
                report.duplicate_count += 1;
                continue;
            }

            let info = if isbn::is_isbn(&barcode.payload) {
                self.resolver.resolve(&barcode.payload).await
            } else {
                None
            };

            let entry = CatalogEntry::new(barcode, info);
            tracing::info!("Added {} ({})", entry.barcode, entry.symbology);
            if catalog.push(entry.clone()) {
                report.new_entries.push(entry);
            }
        }

        report
    }
}
