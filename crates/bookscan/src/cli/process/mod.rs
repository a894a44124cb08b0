//! The `bookscan process` command: scan still images headlessly and export.

mod batch;
pub mod types;

pub use types::FormatArg;

use bookscan_core::export::default_file_name;
use bookscan_core::pipeline::discover_images;
use bookscan_core::types::now_to_second;
use bookscan_core::{Config, ExportFormat};
use clap::Args;
use std::path::PathBuf;

use batch::{print_summary, scan_files};

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Image file or directory of images to scan
    #[arg(required = true)]
    pub input: PathBuf,

    /// Export file (defaults to a timestamped file in export.dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format (defaults to the output extension, then export.format)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Skip Open Library / Google Books lookups
    #[arg(long)]
    pub no_lookup: bool,
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, config: &Config) -> anyhow::Result<()> {
    let input = PathBuf::from(shellexpand::tilde(&args.input.to_string_lossy()).into_owned());
    if !input.exists() {
        anyhow::bail!("Input path not found: {}", input.display());
    }

    let files = discover_images(&input);
    if files.is_empty() {
        anyhow::bail!("No supported images found at {}", input.display());
    }
    tracing::info!("Found {} image(s) to scan", files.len());

    let format = resolve_format(&args, config)?;
    let output = args.output.clone().unwrap_or_else(|| {
        config
            .export_dir()
            .join(default_file_name(format, now_to_second()))
    });

    let pipeline = super::build_pipeline(config, args.no_lookup)?;
    let outcome = scan_files(&pipeline, &files).await;

    let summary = bookscan_core::export(outcome.catalog.entries(), &output, format);
    print_summary(&outcome);

    let summary = summary?;
    println!("{summary}");
    Ok(())
}

/// Explicit flag, else the output extension, else the configured default.
fn resolve_format(args: &ProcessArgs, config: &Config) -> anyhow::Result<ExportFormat> {
    if let Some(format) = args.format {
        return Ok(format.into());
    }
    if let Some(format) = args.output.as_deref().and_then(ExportFormat::from_path) {
        return Ok(format);
    }
    ExportFormat::parse(&config.export.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown export.format {:?}", config.export.format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(output: Option<&str>, format: Option<FormatArg>) -> ProcessArgs {
        ProcessArgs {
            input: PathBuf::from("."),
            output: output.map(PathBuf::from),
            format,
            no_lookup: true,
        }
    }

    #[test]
    fn test_format_flag_wins() {
        let format = resolve_format(&args(Some("out.csv"), Some(FormatArg::Xlsx)), &Config::default());
        assert_eq!(format.unwrap(), ExportFormat::Xlsx);
    }

    #[test]
    fn test_format_from_extension() {
        let format = resolve_format(&args(Some("out.jsonl"), None), &Config::default());
        assert_eq!(format.unwrap(), ExportFormat::Jsonl);
    }

    #[test]
    fn test_format_from_config() {
        let format = resolve_format(&args(None, None), &Config::default());
        assert_eq!(format.unwrap(), ExportFormat::Csv);
    }
}
