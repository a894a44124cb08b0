//! Command handlers for the `bookscan` binary.

pub mod config;
pub mod devices;
pub mod interactive;
pub mod lookup;
pub mod process;
pub mod scan;

use bookscan_core::pipeline::default_decoder;
use bookscan_core::{Config, LookupResolver, ScanPipeline};

/// Build the scan pipeline, optionally with metadata lookup switched off.
pub(crate) fn build_pipeline(config: &Config, no_lookup: bool) -> anyhow::Result<ScanPipeline> {
    if no_lookup {
        tracing::info!("Metadata lookup disabled");
        return Ok(ScanPipeline::new(
            default_decoder(),
            LookupResolver::disabled(),
            config,
        ));
    }
    Ok(ScanPipeline::from_config(config)?)
}
