//! The in-memory, append-only catalog of scanned barcodes.

use std::collections::HashSet;

use crate::types::{CatalogEntry, CatalogStats};

/// Ordered list of entries, unique by raw barcode string.
///
/// Entries are only ever appended; the sole removal is [`Catalog::clear`].
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    barcodes: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match membership test on the raw payload.
    pub fn contains(&self, barcode: &str) -> bool {
        self.barcodes.contains(barcode)
    }

    /// Append an entry. Returns `false` and leaves the catalog untouched if the
    /// barcode is already present.
    pub fn push(&mut self, entry: CatalogEntry) -> bool {
        if !self.barcodes.insert(entry.barcode.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.barcodes.clear();
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total: self.entries.len(),
            books: self.entries.iter().filter(|e| e.is_isbn()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecodedBarcode;

    fn entry(payload: &str, symbology: &str) -> CatalogEntry {
        CatalogEntry::new(DecodedBarcode::new(payload, symbology), None)
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut catalog = Catalog::new();
        assert!(catalog.push(entry("9780306406157", "EAN13")));
        assert!(!catalog.push(entry("9780306406157", "ISBN13")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].symbology, "EAN13");
    }

    #[test]
    fn test_no_normalization_on_uniqueness() {
        let mut catalog = Catalog::new();
        assert!(catalog.push(entry("978-0-306-40615-7", "CODE128")));
        assert!(catalog.push(entry("9780306406157", "EAN13")));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("9780306406157"));
        assert!(!catalog.contains("978 0306406157"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut catalog = Catalog::new();
        for payload in ["c", "a", "b"] {
            catalog.push(entry(payload, "CODE128"));
        }
        let order: Vec<&str> = catalog.entries().iter().map(|e| e.barcode.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_clear_resets_membership() {
        let mut catalog = Catalog::new();
        catalog.push(entry("51299", "EAN5"));
        catalog.clear();
        assert!(catalog.is_empty());
        assert!(!catalog.contains("51299"));
        assert!(catalog.push(entry("51299", "EAN5")));
    }

    #[test]
    fn test_stats_counts_books() {
        let mut catalog = Catalog::new();
        catalog.push(entry("9780306406157", "EAN13"));
        catalog.push(entry("0306406152", "CODE128"));
        catalog.push(entry("51299", "EAN5"));
        let stats = catalog.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.books, 2);
    }
}
