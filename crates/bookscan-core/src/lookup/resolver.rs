//! Ordered fallback across metadata sources.

use std::sync::Arc;
use std::time::Duration;

use super::google_books::GoogleBooksSource;
use super::open_library::OpenLibrarySource;
use super::source::{http_client, resolve_env_var, MetadataSource};
use crate::config::LookupConfig;
use crate::error::PipelineError;
use crate::isbn;
use crate::types::BookInfo;

/// Tries each source in order and returns the first hit.
///
/// Every call performs network I/O from scratch: no caching, no retries.
#[derive(Clone)]
pub struct LookupResolver {
    sources: Vec<Arc<dyn MetadataSource>>,
}

impl LookupResolver {
    /// Build a resolver over an explicit source list (highest priority first).
    pub fn new(sources: Vec<Arc<dyn MetadataSource>>) -> Self {
        Self { sources }
    }

    /// A resolver with no sources; every ISBN resolves to `None`.
    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    /// Open Library first, Google Books second.
    pub fn from_config(config: &LookupConfig) -> Result<Self, PipelineError> {
        if !config.enabled {
            tracing::debug!("Metadata lookup disabled by config");
            return Ok(Self::disabled());
        }

        let client = http_client(config)?;
        let timeout = Duration::from_millis(config.timeout_ms);

        let primary = OpenLibrarySource::new(&config.open_library.base_url, client.clone(), timeout);
        let secondary = GoogleBooksSource::new(
            &config.google_books.base_url,
            resolve_env_var(&config.google_books.api_key),
            client,
            timeout,
        );

        Ok(Self::new(vec![Arc::new(primary), Arc::new(secondary)]))
    }

    /// Names of the configured sources, in query order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn is_enabled(&self) -> bool {
        !self.sources.is_empty()
    }

    /// Resolve a raw ISBN payload to book metadata.
    ///
    /// Hyphens and whitespace are stripped before querying. Any failure from a
    /// source (error, timeout, or no record) falls through to the next one;
    /// `None` means every source came up empty.
    pub async fn resolve(&self, raw: &str) -> Option<BookInfo> {
        if isbn::classify(raw).is_none() {
            tracing::debug!("Skipping lookup for non-ISBN payload {raw:?}");
            return None;
        }
        let clean = isbn::normalize(raw);

        for source in &self.sources {
            tracing::debug!("Looking up ISBN {clean} via {}", source.name());

            match tokio::time::timeout(source.timeout(), source.lookup(&clean)).await {
                Ok(Ok(Some(info))) => {
                    tracing::info!(
                        "Found: {} by {} ({})",
                        info.title,
                        info.author,
                        source.name()
                    );
                    return Some(info);
                }
                Ok(Ok(None)) => {
                    tracing::debug!("{} has no record for {clean}", source.name());
                }
                Ok(Err(e)) => {
                    tracing::warn!("Error looking up book info: {e}");
                }
                Err(_) => {
                    let err = PipelineError::Timeout {
                        stage: format!("{} lookup", source.name()),
                        timeout_ms: source.timeout().as_millis() as u64,
                    };
                    tracing::warn!("Error looking up book info: {err}");
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// A scripted source that records the ISBNs it was asked about.
    struct MockSource {
        name: &'static str,
        response: Box<dyn Fn() -> Result<Option<BookInfo>, PipelineError> + Send + Sync>,
        calls: Arc<AtomicU32>,
        seen: Arc<Mutex<Vec<String>>>,
        delay: Option<Duration>,
    }

    impl MockSource {
        fn new(
            name: &'static str,
            response: impl Fn() -> Result<Option<BookInfo>, PipelineError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                name,
                response: Box::new(response),
                calls: Arc::new(AtomicU32::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
                delay: None,
            }
        }

        fn hit(name: &'static str, title: &str) -> Self {
            let info = book(title);
            Self::new(name, move || Ok(Some(info.clone())))
        }

        fn miss(name: &'static str) -> Self {
            Self::new(name, || Ok(None))
        }

        fn http_error(name: &'static str, status: u16) -> Self {
            Self::new(name, move || {
                Err(PipelineError::Lookup {
                    source_name: name.to_string(),
                    message: format!("HTTP {status}"),
                    status_code: Some(status),
                })
            })
        }
    }

    #[async_trait]
    impl MetadataSource for MockSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn lookup(&self, isbn: &str) -> Result<Option<BookInfo>, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(isbn.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.response)()
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(50)
        }
    }

    fn book(title: &str) -> BookInfo {
        BookInfo {
            title: title.to_string(),
            author: "Someone".to_string(),
            publisher: "Somewhere".to_string(),
        }
    }

    #[tokio::test]
    async fn test_primary_hit_skips_secondary() {
        let primary = MockSource::hit("primary", "From Primary");
        let secondary = MockSource::hit("secondary", "From Secondary");
        let secondary_calls = secondary.calls.clone();

        let resolver = LookupResolver::new(vec![Arc::new(primary), Arc::new(secondary)]);
        let info = resolver.resolve("9780306406157").await.unwrap();

        assert_eq!(info.title, "From Primary");
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_miss_falls_through() {
        let resolver = LookupResolver::new(vec![
            Arc::new(MockSource::miss("primary")),
            Arc::new(MockSource::hit("secondary", "From Secondary")),
        ]);
        let info = resolver.resolve("9780306406157").await.unwrap();
        assert_eq!(info.title, "From Secondary");
    }

    #[tokio::test]
    async fn test_primary_http_error_falls_through() {
        let resolver = LookupResolver::new(vec![
            Arc::new(MockSource::http_error("primary", 503)),
            Arc::new(MockSource::hit("secondary", "From Secondary")),
        ]);
        let info = resolver.resolve("0306406152").await.unwrap();
        assert_eq!(info.title, "From Secondary");
    }

    #[tokio::test]
    async fn test_primary_timeout_falls_through() {
        let mut slow = MockSource::hit("primary", "Too Late");
        slow.delay = Some(Duration::from_secs(5));

        let resolver = LookupResolver::new(vec![
            Arc::new(slow),
            Arc::new(MockSource::hit("secondary", "From Secondary")),
        ]);
        let info = resolver.resolve("9780306406157").await.unwrap();
        assert_eq!(info.title, "From Secondary");
    }

    #[tokio::test]
    async fn test_all_sources_fail_is_none() {
        let resolver = LookupResolver::new(vec![
            Arc::new(MockSource::http_error("primary", 500)),
            Arc::new(MockSource::miss("secondary")),
        ]);
        assert!(resolver.resolve("9780306406157").await.is_none());
    }

    #[tokio::test]
    async fn test_isbn_is_normalized_before_query() {
        let primary = MockSource::miss("primary");
        let seen = primary.seen.clone();

        let resolver = LookupResolver::new(vec![Arc::new(primary)]);
        resolver.resolve("978-0-306-40615-7").await;

        assert_eq!(*seen.lock().unwrap(), vec!["9780306406157".to_string()]);
    }

    #[tokio::test]
    async fn test_non_isbn_never_queried() {
        let primary = MockSource::hit("primary", "Nope");
        let calls = primary.calls.clone();

        let resolver = LookupResolver::new(vec![Arc::new(primary)]);
        assert!(resolver.resolve("ABC-12345").await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_every_call_hits_network() {
        let primary = MockSource::hit("primary", "Again");
        let calls = primary.calls.clone();

        let resolver = LookupResolver::new(vec![Arc::new(primary)]);
        resolver.resolve("9780306406157").await;
        resolver.resolve("9780306406157").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config_order() {
        let resolver = LookupResolver::from_config(&LookupConfig::default()).unwrap();
        assert_eq!(resolver.source_names(), vec!["openlibrary", "googlebooks"]);
    }

    #[test]
    fn test_from_config_disabled() {
        let config = LookupConfig {
            enabled: false,
            ..Default::default()
        };
        let resolver = LookupResolver::from_config(&config).unwrap();
        assert!(!resolver.is_enabled());
    }
}
