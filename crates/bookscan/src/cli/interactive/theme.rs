//! Custom dialoguer theme, banner, and status styling for the scan session.

use bookscan_core::Severity;
use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns a `ColorfulTheme` configured with Bookscan's visual identity.
///
/// - Prompt prefix: cyan `?`
/// - Active item indicator: cyan `▸`
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn bookscan_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().cyan(),
        active_item_style: Style::new().for_stderr().cyan(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Prints the Bookscan banner to stderr.
pub fn print_banner(source: &str) {
    let version_line = format!("Bookscan v{}", bookscan_core::VERSION);
    let tagline = "Barcode scanner for book cataloguing";

    let inner_width = tagline.len() + 4;

    let top = format!("  ╔{:═<width$}╗", "", width = inner_width);
    let mid1 = format!("  ║{:^width$}║", version_line, width = inner_width);
    let mid2 = format!("  ║{:^width$}║", tagline, width = inner_width);
    let bot = format!("  ╚{:═<width$}╝", "", width = inner_width);

    let cyan = Style::new().for_stderr().cyan();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!("{}", cyan.apply_to(&top));
    eprintln!("{}", cyan.apply_to(&mid1));
    eprintln!("{}", cyan.apply_to(&mid2));
    eprintln!("{}", cyan.apply_to(&bot));
    eprintln!("  {}", dim.apply_to(format!("Camera: {source}")));
    eprintln!();
}

/// Print a one-line status message with an icon and colour for its severity.
pub fn print_status(severity: Severity, message: &str) {
    let (icon, style) = match severity {
        Severity::Success => ("✓", Style::new().for_stderr().green()),
        Severity::Warning => ("!", Style::new().for_stderr().yellow()),
        Severity::Info => ("i", Style::new().for_stderr().cyan()),
        Severity::Error => ("✗", Style::new().for_stderr().red()),
    };
    eprintln!("  {} {}", style.apply_to(icon), style.apply_to(message));
}
