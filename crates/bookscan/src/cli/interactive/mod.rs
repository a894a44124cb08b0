//! Interactive scan session: a menu loop over a live [`ScanSession`].
//!
//! Scans run on the session's worker; this loop only waits for the resulting
//! [`ScanEvent`] behind a spinner and redraws the results table.

pub mod table;
pub mod theme;

use bookscan_core::export::default_file_name;
use bookscan_core::types::now_to_second;
use bookscan_core::{
    Config, ExportError, ExportFormat, ScanEvent, ScanSession, Severity,
};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use theme::{bookscan_theme, print_status};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Session menu options.
const MENU_ITEMS: &[&str] = &[
    "Scan now",
    "Show scanned items",
    "Export to CSV",
    "Export to Excel",
    "Clear list",
    "Save preview frame",
    "Quit",
];

/// Run the menu loop until the user quits. Dropping the session on return
/// stops the preview worker and releases the camera.
pub async fn run(
    session: ScanSession,
    mut events: mpsc::Receiver<ScanEvent>,
    config: &Config,
) -> anyhow::Result<()> {
    let source = session
        .camera()
        .map(|c| c.description().to_string())
        .unwrap_or_else(|| "none".to_string());
    theme::print_banner(&source);

    let theme = bookscan_theme();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("Position the book barcode under the camera")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => scan_once(&session, &mut events).await?,
            Some(1) => show_table(&session).await,
            Some(2) => export_flow(&session, config, ExportFormat::Csv).await?,
            Some(3) => export_flow(&session, config, ExportFormat::Xlsx).await?,
            Some(4) => clear_flow(&session).await?,
            Some(5) => save_preview(&session, config),
            Some(6) | None => break, // Quit or Ctrl+C / Esc
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// Request one scan and wait for its event behind a spinner.
async fn scan_once(
    session: &ScanSession,
    events: &mut mpsc::Receiver<ScanEvent>,
) -> anyhow::Result<()> {
    match session.request_scan() {
        Ok(true) => {}
        Ok(false) => {
            print_status(Severity::Info, "Scan ignored: please wait a moment between scans");
            return Ok(());
        }
        Err(e) => {
            print_status(Severity::Error, &e.to_string());
            return Ok(());
        }
    }

    let spinner = create_spinner("Scanning...");
    let event = events.recv().await;
    spinner.finish_and_clear();

    match event {
        Some(ScanEvent::Completed(report)) => {
            let outcome = report.outcome();
            print_status(outcome.severity(), &outcome.message());
            show_table(session).await;
        }
        Some(ScanEvent::Failed(message)) => {
            print_status(Severity::Error, &format!("Failed to capture frame: {message}"));
        }
        None => anyhow::bail!("scan worker channel closed"),
    }
    Ok(())
}

async fn show_table(session: &ScanSession) {
    let entries = session.entries().await;
    let stats = session.stats().await;
    table::print_table(&entries, stats);
}

/// Ask for a destination and write the catalog.
async fn export_flow(
    session: &ScanSession,
    config: &Config,
    format: ExportFormat,
) -> anyhow::Result<()> {
    if session.stats().await.total == 0 {
        print_status(Severity::Warning, &ExportError::NothingToExport.to_string());
        return Ok(());
    }

    let suggested = config
        .export_dir()
        .join(default_file_name(format, now_to_second()));

    let Some(raw_path) = handle_interrupt(
        Input::<String>::with_theme(&bookscan_theme())
            .with_prompt(format!("Save {} as", format.extension().to_uppercase()))
            .default(suggested.display().to_string())
            .interact_text(),
    )?
    else {
        return Ok(());
    };

    let path = PathBuf::from(shellexpand::tilde(&raw_path).into_owned());

    match session.export(&path, format).await {
        Ok(summary) => print_status(Severity::Success, &summary.to_string()),
        Err(ExportError::NothingToExport) => {
            print_status(Severity::Warning, &ExportError::NothingToExport.to_string())
        }
        Err(e) => {
            tracing::error!("Export to {:?} failed: {e}", path);
            print_status(Severity::Error, &format!("Failed to export: {e}"));
        }
    }
    Ok(())
}

async fn clear_flow(session: &ScanSession) -> anyhow::Result<()> {
    let confirmed = Confirm::with_theme(&bookscan_theme())
        .with_prompt("Are you sure you want to clear all scanned items?")
        .default(false)
        .interact_opt()?;

    if confirmed == Some(true) {
        session.clear().await;
        print_status(Severity::Info, "List cleared");
        show_table(session).await;
    }
    Ok(())
}

/// Write the latest preview frame next to the exports.
fn save_preview(session: &ScanSession, config: &Config) {
    let Some(frame) = session.preview().and_then(|p| p.latest()) else {
        print_status(Severity::Warning, "No preview frame available yet");
        return;
    };

    let name = format!("preview_{}.png", now_to_second().format("%Y%m%d_%H%M%S"));
    let path = config.export_dir().join(name);

    match frame.save(&path) {
        Ok(()) => print_status(
            Severity::Success,
            &format!("Preview saved to {}", path.display()),
        ),
        Err(e) => print_status(Severity::Error, &format!("Failed to save preview: {e}")),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
