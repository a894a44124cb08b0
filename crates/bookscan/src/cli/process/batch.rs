//! Batch scanning: one frame per file with progress, then a summary.

use bookscan_core::camera::load_frame;
use bookscan_core::{Catalog, ScanPipeline};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Totals gathered while scanning a batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub catalog: Catalog,
    pub frames: u64,
    pub unreadable: u64,
    pub decode_errors: u64,
    pub decoded: u64,
    pub added: u64,
    pub duplicates: u64,
    pub elapsed: Duration,
}

/// Scan every file into a fresh catalog, in order.
pub async fn scan_files(pipeline: &ScanPipeline, files: &[PathBuf]) -> BatchOutcome {
    let progress = create_progress_bar(files.len() as u64);
    let start_time = Instant::now();
    let mut outcome = BatchOutcome::default();

    for path in files {
        outcome.frames += 1;

        match load_frame(path) {
            Ok(frame) => {
                let report = pipeline.process(frame, &mut outcome.catalog).await;
                if report.decode_failed {
                    outcome.decode_errors += 1;
                }
                outcome.decoded += report.decoded_count as u64;
                outcome.added += report.new_entries.len() as u64;
                outcome.duplicates += report.duplicate_count as u64;
                tracing::debug!("{:?}: {}", path, report.outcome().message());
            }
            Err(e) => {
                outcome.unreadable += 1;
                tracing::error!("Failed: {e}");
            }
        }

        progress.inc(1);
        progress.set_message(format!("{} book(s)", outcome.catalog.stats().books));
    }

    outcome.elapsed = start_time.elapsed();
    progress.finish_and_clear();
    outcome
}

/// Create a progress bar for batch scanning.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch scanning.
pub fn print_summary(outcome: &BatchOutcome) {
    let stats = outcome.catalog.stats();

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Images:       {:>8}", outcome.frames);
    if outcome.unreadable > 0 {
        eprintln!("    Unreadable:   {:>8}", outcome.unreadable);
    }
    if outcome.decode_errors > 0 {
        eprintln!("    Scan errors:  {:>8}", outcome.decode_errors);
    }
    eprintln!("    Barcodes:     {:>8}", outcome.decoded);
    eprintln!("    Duplicates:   {:>8}", outcome.duplicates);
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", stats.total);
    eprintln!("    Books:        {:>8}", stats.books);
    eprintln!("    Duration:     {:>7.1}s", outcome.elapsed.as_secs_f64());
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookscan_core::error::PipelineResult;
    use bookscan_core::types::DecodedBarcode;
    use bookscan_core::{BarcodeDecoder, Config, LookupResolver};
    use std::sync::Arc;

    struct FixedDecoder;

    impl BarcodeDecoder for FixedDecoder {
        fn name(&self) -> &str {
            "fixed"
        }

        fn decode(&self, _frame: &image::DynamicImage) -> PipelineResult<Vec<DecodedBarcode>> {
            Ok(vec![DecodedBarcode::new("ABC-42", "CODE128")])
        }
    }

    #[tokio::test]
    async fn test_scan_files_counts_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let good_a = dir.path().join("a.png");
        let good_b = dir.path().join("b.png");
        let bad = dir.path().join("c.jpg");
        image::GrayImage::new(8, 8).save(&good_a).unwrap();
        image::GrayImage::new(8, 8).save(&good_b).unwrap();
        std::fs::write(&bad, b"garbage").unwrap();

        let pipeline = ScanPipeline::new(
            Arc::new(FixedDecoder),
            LookupResolver::disabled(),
            &Config::default(),
        );
        let outcome = scan_files(&pipeline, &[good_a, good_b, bad]).await;

        assert_eq!(outcome.frames, 3);
        assert_eq!(outcome.unreadable, 1);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.catalog.len(), 1);
    }
}
