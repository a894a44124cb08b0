//! Bookscan CLI - scan book barcodes from a document camera into a catalog.
//!
//! Frames come from a USB camera (or still images); every barcode found is
//! added once, ISBNs are looked up on Open Library and Google Books, and the
//! catalog can be exported to CSV or Excel.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session on the first working camera
//! bookscan scan
//!
//! # Scan a folder of photos and export
//! bookscan process ./shelf-photos/ --output books.xlsx
//!
//! # Look up a single ISBN
//! bookscan lookup 978-0-306-40615-7
//!
//! # View configuration
//! bookscan config show
//! ```

use bookscan_core::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Bookscan - barcode scanner for book cataloguing.
#[derive(Parser, Debug)]
#[command(name = "bookscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "BOOKSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Defaults to `scan`
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive scanning session
    Scan(cli::scan::ScanArgs),

    /// Scan still images without interaction and export the results
    Process(cli::process::ProcessArgs),

    /// Look up book metadata for ISBNs
    Lookup(cli::lookup::LookupArgs),

    /// List camera devices that yield frames
    Devices(cli::devices::DevicesArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `bookscan config path`."
            );
            Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Bookscan v{}", bookscan_core::VERSION);

    match cli.command {
        Some(Commands::Scan(args)) => cli::scan::execute(args, &config).await,
        None => cli::scan::execute(Default::default(), &config).await,
        Some(Commands::Process(args)) => cli::process::execute(args, &config).await,
        Some(Commands::Lookup(args)) => cli::lookup::execute(args, &config).await,
        Some(Commands::Devices(args)) => cli::devices::execute(args, &config).await,
        Some(Commands::Config(args)) => cli::config::execute(args, &config).await,
    }
}
