//! Benchmarks for the Bookscan scan pipeline.
//!
//! Run with: cargo bench -p bookscan-core

use bookscan_core::types::DecodedBarcode;
use bookscan_core::{Catalog, CatalogEntry};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::DynamicImage;

fn benchmark_classify(c: &mut Criterion) {
    let payloads = [
        "9780306406157",
        "978-0-306-40615-7",
        "080442957X",
        "4006381333931",
        "https://example.com/not-a-book",
    ];

    c.bench_function("isbn_classify", |b| {
        b.iter(|| {
            for payload in &payloads {
                let _ = bookscan_core::classify(black_box(payload));
            }
        })
    });
}

fn benchmark_catalog_dedupe(c: &mut Criterion) {
    let entries: Vec<CatalogEntry> = (0..1000)
        .map(|i| CatalogEntry::new(DecodedBarcode::new(format!("97800000{i:05}"), "EAN13"), None))
        .collect();

    c.bench_function("catalog_push_1000_with_repeats", |b| {
        b.iter(|| {
            let mut catalog = Catalog::new();
            for entry in entries.iter().chain(entries.iter()) {
                catalog.push(black_box(entry.clone()));
            }
            catalog.len()
        })
    });
}

fn benchmark_preview_scale(c: &mut Criterion) {
    let frame = DynamicImage::new_rgb8(1920, 1080);

    c.bench_function("preview_thumbnail_400x300", |b| {
        b.iter(|| black_box(&frame).thumbnail(400, 300))
    });
}

#[cfg(feature = "zbar")]
fn benchmark_decode_blank(c: &mut Criterion) {
    use bookscan_core::pipeline::{BarcodeDecoder, ZbarDecoder};

    let decoder = ZbarDecoder::new();
    let frame = DynamicImage::new_luma8(1920, 1080);

    c.bench_function("zbar_decode_blank_1080p", |b| {
        b.iter(|| {
            let _ = decoder.decode(black_box(&frame));
        })
    });
}

#[cfg(not(feature = "zbar"))]
fn benchmark_decode_blank(_c: &mut Criterion) {}

criterion_group!(
    benches,
    benchmark_classify,
    benchmark_catalog_dedupe,
    benchmark_preview_scale,
    benchmark_decode_blank,
);
criterion_main!(benches);
