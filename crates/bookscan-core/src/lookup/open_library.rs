//! Open Library books API (primary source).
//!
//! `GET /api/books?bibkeys=ISBN:<isbn>&jscmd=data&format=json` returns an object
//! keyed by the bibkey; an unknown ISBN yields `{}`.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::source::{get_text, malformed, MetadataSource};
use crate::error::PipelineError;
use crate::types::{BookInfo, UNKNOWN_AUTHOR, UNKNOWN_PUBLISHER, UNKNOWN_TITLE};

const NAME: &str = "openlibrary";

/// Open Library client.
pub struct OpenLibrarySource {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OpenLibrarySource {
    pub fn new(base_url: &str, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        }
    }
}

#[derive(Deserialize)]
struct OpenLibraryRecord {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<NamedRef>,
    #[serde(default)]
    publishers: Vec<NamedRef>,
}

#[derive(Deserialize)]
struct NamedRef {
    name: Option<String>,
}

/// Extract book info from an Open Library response body.
pub(crate) fn parse_response(body: &str, isbn: &str) -> Result<Option<BookInfo>, PipelineError> {
    let mut records: HashMap<String, OpenLibraryRecord> =
        serde_json::from_str(body).map_err(|e| malformed(NAME, e))?;

    let Some(record) = records.remove(&format!("ISBN:{isbn}")) else {
        return Ok(None);
    };

    let authors: Vec<String> = record
        .authors
        .into_iter()
        .map(|a| a.name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()))
        .collect();
    let author = if authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        authors.join(", ")
    };

    let publisher = record
        .publishers
        .into_iter()
        .next()
        .and_then(|p| p.name)
        .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string());

    Ok(Some(BookInfo {
        title: record.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        author,
        publisher,
    }))
}

#[async_trait]
impl MetadataSource for OpenLibrarySource {
    fn name(&self) -> &str {
        NAME
    }

    async fn lookup(&self, isbn: &str) -> Result<Option<BookInfo>, PipelineError> {
        let url = format!("{}/api/books", self.base_url);
        let bibkey = format!("ISBN:{isbn}");
        let request = self
            .client
            .get(&url)
            .query(&[
                ("bibkeys", bibkey.as_str()),
                ("jscmd", "data"),
                ("format", "json"),
            ])
            .timeout(self.timeout);

        let body = get_text(NAME, request).await?;
        parse_response(&body, isbn)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let body = r#"{
            "ISBN:9780441013593": {
                "title": "Dune",
                "authors": [{"name": "Frank Herbert", "url": "https://openlibrary.org/authors/OL79034A"}],
                "publishers": [{"name": "Ace Books"}, {"name": "Chilton"}]
            }
        }"#;
        let info = parse_response(body, "9780441013593").unwrap().unwrap();
        assert_eq!(info.title, "Dune");
        assert_eq!(info.author, "Frank Herbert");
        assert_eq!(info.publisher, "Ace Books");
    }

    #[test]
    fn test_parse_multiple_authors_joined() {
        let body = r#"{"ISBN:0262033844": {
            "title": "Introduction to Algorithms",
            "authors": [{"name": "Thomas H. Cormen"}, {"name": "Charles E. Leiserson"}, {}]
        }}"#;
        let info = parse_response(body, "0262033844").unwrap().unwrap();
        assert_eq!(
            info.author,
            "Thomas H. Cormen, Charles E. Leiserson, Unknown Author"
        );
        assert_eq!(info.publisher, UNKNOWN_PUBLISHER);
    }

    #[test]
    fn test_parse_missing_fields_use_placeholders() {
        let body = r#"{"ISBN:0306406152": {"authors": [], "publishers": []}}"#;
        let info = parse_response(body, "0306406152").unwrap().unwrap();
        assert_eq!(info.title, UNKNOWN_TITLE);
        assert_eq!(info.author, UNKNOWN_AUTHOR);
        assert_eq!(info.publisher, UNKNOWN_PUBLISHER);
    }

    #[test]
    fn test_parse_unknown_isbn_is_none() {
        assert!(parse_response("{}", "9780306406157").unwrap().is_none());
    }

    #[test]
    fn test_parse_other_key_is_none() {
        let body = r#"{"ISBN:0306406152": {"title": "Other"}}"#;
        assert!(parse_response(body, "9780306406157").unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_is_error() {
        assert!(parse_response("<html>", "9780306406157").is_err());
        assert!(parse_response("[]", "9780306406157").is_err());
    }
}
