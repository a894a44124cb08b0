//! JSON and JSONL serialization of catalog entries.

use serde::Serialize;
use std::io::{self, Write};

use crate::error::ExportError;

/// Layout of a JSON export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    /// A single pretty-printed array
    Array,
    /// One compact object per line (newline-delimited JSON)
    Lines,
}

/// A writer that serializes items as a JSON array or as JSON Lines.
pub struct JsonWriter<W: Write> {
    writer: W,
    layout: JsonLayout,
    items_written: usize,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W, layout: JsonLayout) -> Self {
        Self {
            writer,
            layout,
            items_written: 0,
        }
    }

    /// Write a batch of items.
    ///
    /// For `Array`, writes one JSON array. For `Lines`, one object per line.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> Result<(), ExportError> {
        match self.layout {
            JsonLayout::Array => {
                serde_json::to_writer_pretty(&mut self.writer, items)?;
                writeln!(self.writer)?;
                self.items_written += items.len();
            }
            JsonLayout::Lines => {
                for item in items {
                    // JSONL is never pretty-printed
                    serde_json::to_writer(&mut self.writer, item)?;
                    writeln!(self.writer)?;
                    self.items_written += 1;
                }
            }
        }
        Ok(())
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        barcode: String,
        title: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                barcode: "9780306406157".to_string(),
                title: "A".to_string(),
            },
            Row {
                barcode: "0306406152".to_string(),
                title: "B".to_string(),
            },
        ]
    }

    #[test]
    fn test_write_array() {
        let mut buffer = Vec::new();
        let mut writer = JsonWriter::new(&mut buffer, JsonLayout::Array);
        writer.write_all(&rows()).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_write_lines() {
        let mut buffer = Vec::new();
        let mut writer = JsonWriter::new(&mut buffer, JsonLayout::Lines);
        writer.write_all(&rows()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"barcode\":\"9780306406157\""));
    }

    #[test]
    fn test_unserializable_item_is_json_error() {
        // JSON object keys must be strings
        let item = std::collections::BTreeMap::from([(vec![1u8], 1u8)]);
        let mut writer = JsonWriter::new(Vec::new(), JsonLayout::Lines);

        let err = writer.write_all(&[item]).unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
        assert_eq!(writer.items_written(), 0);
    }
}
