//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::export::ExportFormat;

use super::Config;

/// Shortest allowed gap between accepted scan requests.
const MIN_COOLDOWN_MS: u64 = 1000;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.max_probe_index == 0 {
            return Err(ConfigError::ValidationError(
                "camera.max_probe_index must be > 0".into(),
            ));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(ConfigError::ValidationError(
                "camera.width and camera.height must be > 0".into(),
            ));
        }
        if self.camera.preview_fps == 0 || self.camera.preview_fps > 120 {
            return Err(ConfigError::ValidationError(
                "camera.preview_fps must be between 1 and 120".into(),
            ));
        }
        if self.camera.preview_width == 0 || self.camera.preview_height == 0 {
            return Err(ConfigError::ValidationError(
                "camera.preview_width and camera.preview_height must be > 0".into(),
            ));
        }
        if self.scan.cooldown_ms < MIN_COOLDOWN_MS {
            return Err(ConfigError::ValidationError(format!(
                "scan.cooldown_ms must be at least {MIN_COOLDOWN_MS}"
            )));
        }
        if self.scan.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "scan.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.lookup.timeout_ms == 0 || self.lookup.timeout_ms >= 10_000 {
            return Err(ConfigError::ValidationError(
                "lookup.timeout_ms must be between 1 and 9999".into(),
            ));
        }
        if ExportFormat::parse(&self.export.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "export.format must be one of csv, xlsx, json, jsonl (got '{}')",
                self.export.format
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
