//! Tabular exports: CSV and Excel workbooks.

use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::error::ExportError;
use crate::types::{CatalogEntry, EXPORT_COLUMNS};

/// Name of the single worksheet in an Excel export.
pub const SHEET_NAME: &str = "Books";

/// Write entries as CSV with a header row.
pub(crate) fn write_csv(entries: &[CatalogEntry], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    // serde emits the header from the field names on the first row
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write entries to a workbook with one bold header row.
pub(crate) fn write_xlsx(entries: &[CatalogEntry], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (row, entry) in entries.iter().enumerate() {
        for (col, value) in entry.to_row().iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, value)?;
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}
