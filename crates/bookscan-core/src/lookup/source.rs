//! Metadata source trait and shared HTTP helpers.
//!
//! Every bibliographic service implements [`MetadataSource`]; the resolver
//! walks a list of them in priority order.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::LookupConfig;
use crate::error::PipelineError;
use crate::types::BookInfo;

/// Trait that all bibliographic services implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the resolver holds `Arc<dyn MetadataSource>`).
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Source name for logging (e.g., "openlibrary", "googlebooks").
    fn name(&self) -> &str;

    /// Look up a normalized ISBN.
    ///
    /// `Ok(None)` means the service answered but has no record for the ISBN.
    async fn lookup(&self, isbn: &str) -> Result<Option<BookInfo>, PipelineError>;

    /// Per-request timeout for this source.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Build the shared HTTP client for lookup sources.
pub(crate) fn http_client(config: &LookupConfig) -> Result<reqwest::Client, PipelineError> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
        .map_err(|e| PipelineError::Lookup {
            source_name: "http".to_string(),
            message: format!("Failed to build HTTP client: {e}"),
            status_code: None,
        })
}

/// Send a GET and return the body, mapping transport and status failures.
pub(crate) async fn get_text(
    source_name: &str,
    request: reqwest::RequestBuilder,
) -> Result<String, PipelineError> {
    let resp = request.send().await.map_err(|e| {
        let what = if e.is_timeout() {
            "request timed out"
        } else {
            "request failed"
        };
        PipelineError::Lookup {
            source_name: source_name.to_string(),
            message: format!("{what}: {e}"),
            status_code: None,
        }
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(PipelineError::Lookup {
            source_name: source_name.to_string(),
            message: format!("HTTP {status}"),
            status_code: Some(status.as_u16()),
        });
    }

    resp.text().await.map_err(|e| PipelineError::Lookup {
        source_name: source_name.to_string(),
        message: format!("failed to read response body: {e}"),
        status_code: None,
    })
}

/// Wrap a JSON parse failure.
pub(crate) fn malformed(source_name: &str, err: serde_json::Error) -> PipelineError {
    PipelineError::Lookup {
        source_name: source_name.to_string(),
        message: format!("malformed response: {err}"),
        status_code: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_http_client_builds_from_defaults() {
        assert!(http_client(&LookupConfig::default()).is_ok());
    }

    #[test]
    fn test_malformed_has_no_status() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        match malformed("openlibrary", err) {
            PipelineError::Lookup {
                source_name,
                status_code,
                ..
            } => {
                assert_eq!(source_name, "openlibrary");
                assert!(status_code.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
