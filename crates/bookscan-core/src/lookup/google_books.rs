//! Google Books volumes API (secondary source).

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::source::{get_text, malformed, MetadataSource};
use crate::error::PipelineError;
use crate::types::{BookInfo, UNKNOWN_AUTHOR, UNKNOWN_PUBLISHER, UNKNOWN_TITLE};

const NAME: &str = "googlebooks";

/// Google Books client.
pub struct GoogleBooksSource {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
}

impl GoogleBooksSource {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        client: reqwest::Client,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout,
        }
    }
}

#[derive(Deserialize)]
struct VolumesResponse {
    #[serde(rename = "totalItems", default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Deserialize, Default)]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
}

/// Extract book info from a volumes search response body.
pub(crate) fn parse_response(body: &str) -> Result<Option<BookInfo>, PipelineError> {
    let response: VolumesResponse = serde_json::from_str(body).map_err(|e| malformed(NAME, e))?;

    if response.total_items == 0 {
        return Ok(None);
    }
    let Some(volume) = response.items.into_iter().next() else {
        return Ok(None);
    };
    let info = volume.volume_info;

    let author = if info.authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        info.authors.join(", ")
    };

    Ok(Some(BookInfo {
        title: info.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        author,
        publisher: info
            .publisher
            .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string()),
    }))
}

#[async_trait]
impl MetadataSource for GoogleBooksSource {
    fn name(&self) -> &str {
        NAME
    }

    async fn lookup(&self, isbn: &str) -> Result<Option<BookInfo>, PipelineError> {
        let url = format!("{}/books/v1/volumes", self.base_url);
        let query = format!("isbn:{isbn}");

        let mut request = self
            .client
            .get(&url)
            .query(&[("q", query.as_str())])
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let body = get_text(NAME, request).await?;
        parse_response(&body)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_item() {
        let body = r#"{
            "kind": "books#volumes",
            "totalItems": 2,
            "items": [
                {"volumeInfo": {"title": "Dune", "authors": ["Frank Herbert"], "publisher": "Penguin"}},
                {"volumeInfo": {"title": "Dune Messiah"}}
            ]
        }"#;
        let info = parse_response(body).unwrap().unwrap();
        assert_eq!(info.title, "Dune");
        assert_eq!(info.author, "Frank Herbert");
        assert_eq!(info.publisher, "Penguin");
    }

    #[test]
    fn test_parse_joins_authors() {
        let body = r#"{"totalItems": 1, "items": [{"volumeInfo": {
            "title": "Good Omens", "authors": ["Terry Pratchett", "Neil Gaiman"]
        }}]}"#;
        let info = parse_response(body).unwrap().unwrap();
        assert_eq!(info.author, "Terry Pratchett, Neil Gaiman");
        assert_eq!(info.publisher, UNKNOWN_PUBLISHER);
    }

    #[test]
    fn test_parse_empty_authors_uses_placeholder() {
        let body = r#"{"totalItems": 1, "items": [{"volumeInfo": {"authors": []}}]}"#;
        let info = parse_response(body).unwrap().unwrap();
        assert_eq!(info.title, UNKNOWN_TITLE);
        assert_eq!(info.author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_parse_missing_volume_info() {
        let body = r#"{"totalItems": 1, "items": [{"id": "abc"}]}"#;
        let info = parse_response(body).unwrap().unwrap();
        assert_eq!(info, BookInfo::default());
    }

    #[test]
    fn test_parse_zero_items_is_none() {
        assert!(parse_response(r#"{"kind": "books#volumes", "totalItems": 0}"#)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_parse_items_missing_is_none() {
        assert!(parse_response(r#"{"totalItems": 3}"#).unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_is_error() {
        assert!(parse_response("not json").is_err());
    }
}
