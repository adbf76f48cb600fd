//! Retry and size limits for the extraction engine

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Extraction engine settings, loadable from the `[extractor]` config table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Corrective attempts allowed after the first one
    pub max_retries: u32,

    /// Pause before each corrective attempt (milliseconds)
    pub retry_delay_ms: u64,

    /// Maximum time for a single model call (seconds)
    pub extraction_timeout_secs: u64,

    /// Maximum page HTML size sent to the model (bytes)
    pub max_html_length: usize,
}

impl ExtractorConfig {
    /// Total number of model calls a single extraction may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Get the retry delay as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Upper bound for one model call
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_html_length == 0 {
            return Err(ExtractorError::Config(
                "max_html_length must be greater than 0".to_string(),
            ));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "extraction_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for ExtractorConfig {
    /// Two corrective attempts, one second apart
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay_ms: 1_000,
            extraction_timeout_secs: 180,
            max_html_length: 1_000_000,
        }
    }
}
