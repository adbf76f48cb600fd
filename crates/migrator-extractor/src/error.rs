//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Content problems (leftover HTML) are not errors; they are reported on the
/// returned [`crate::Extraction`].
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Page HTML exceeds maximum length
    #[error("HTML too long: {0} bytes (max: {1})")]
    HtmlTooLong(usize, usize),

    /// Extraction timeout
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
