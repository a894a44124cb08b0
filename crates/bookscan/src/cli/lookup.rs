//! The `bookscan lookup` command: resolve ISBNs without a camera.

use bookscan_core::{is_isbn, BookInfo, Config, LookupResolver};
use clap::Args;
use serde::Serialize;

/// Arguments for the `lookup` command.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// ISBN-10 or ISBN-13 values (hyphens allowed)
    #[arg(required = true)]
    pub isbns: Vec<String>,

    /// Print results as JSON Lines on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct LookupRecord<'a> {
    isbn: &'a str,
    found: bool,
    #[serde(flatten)]
    info: BookInfo,
}

/// Execute the lookup command.
pub async fn execute(args: LookupArgs, config: &Config) -> anyhow::Result<()> {
    let resolver = LookupResolver::from_config(&config.lookup)?;
    if !resolver.is_enabled() {
        anyhow::bail!("Metadata lookup is disabled in the configuration ([lookup] enabled = false)");
    }

    for isbn in &args.isbns {
        if !is_isbn(isbn) {
            tracing::warn!("{isbn:?} is not an ISBN-10 or ISBN-13, skipping");
            continue;
        }

        let found = resolver.resolve(isbn).await;
        let record = LookupRecord {
            isbn,
            found: found.is_some(),
            info: found.unwrap_or_default(),
        };

        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", format_record(&record));
        }
    }

    Ok(())
}

fn format_record(record: &LookupRecord<'_>) -> String {
    if !record.found {
        return format!("{}  (not found)", record.isbn);
    }
    format!(
        "{}  {} by {} ({})",
        record.isbn, record.info.title, record.info.author, record.info.publisher
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_found_and_missing() {
        let found = LookupRecord {
            isbn: "9780306406157",
            found: true,
            info: BookInfo {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                publisher: "Chilton".to_string(),
            },
        };
        assert_eq!(
            format_record(&found),
            "9780306406157  Dune by Frank Herbert (Chilton)"
        );

        let missing = LookupRecord {
            isbn: "0306406152",
            found: false,
            info: BookInfo::default(),
        };
        assert_eq!(format_record(&missing), "0306406152  (not found)");
    }

    #[test]
    fn test_record_json_is_flat() {
        let record = LookupRecord {
            isbn: "0306406152",
            found: false,
            info: BookInfo::default(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"title\":\"Unknown Title\""));
        assert!(json.contains("\"found\":false"));
    }
}
