//! Results table for the scan session, newest entry first.

use bookscan_core::{CatalogEntry, CatalogStats};
use console::Style;

const BARCODE_WIDTH: usize = 22;
const TITLE_WIDTH: usize = 30;
const AUTHOR_WIDTH: usize = 20;
const PUBLISHER_WIDTH: usize = 18;

/// Truncate to `width` characters, marking the cut with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Render the table rows (header first) without styling.
pub fn render_rows(entries: &[CatalogEntry]) -> Vec<String> {
    let mut rows = Vec::with_capacity(entries.len() + 1);
    rows.push(format!(
        "{:<8}  {:<bw$}  {:<tw$}  {:<aw$}  {:<pw$}",
        "Time",
        "Barcode",
        "Title",
        "Author",
        "Publisher",
        bw = BARCODE_WIDTH,
        tw = TITLE_WIDTH,
        aw = AUTHOR_WIDTH,
        pw = PUBLISHER_WIDTH
    ));

    for entry in entries.iter().rev() {
        rows.push(format!(
            "{:<8}  {:<bw$}  {:<tw$}  {:<aw$}  {:<pw$}",
            entry.timestamp.format("%H:%M:%S").to_string(),
            fit(&entry.display_barcode(), BARCODE_WIDTH),
            fit(&entry.title, TITLE_WIDTH),
            fit(&entry.author, AUTHOR_WIDTH),
            fit(&entry.publisher, PUBLISHER_WIDTH),
            bw = BARCODE_WIDTH,
            tw = TITLE_WIDTH,
            aw = AUTHOR_WIDTH,
            pw = PUBLISHER_WIDTH
        ));
    }
    rows
}

/// Print the results table and running totals to stderr.
pub fn print_table(entries: &[CatalogEntry], stats: CatalogStats) {
    let bold = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    if entries.is_empty() {
        eprintln!("  {}", dim.apply_to("No items scanned yet."));
    } else {
        let rows = render_rows(entries);
        eprintln!("  {}", bold.apply_to(&rows[0]));
        for row in &rows[1..] {
            eprintln!("  {row}");
        }
    }
    eprintln!();
    eprintln!("  {}", dim.apply_to(stats.to_string()));
    eprintln!();
}
