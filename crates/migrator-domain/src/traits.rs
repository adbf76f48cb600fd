//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (migrator-llm). Implementations
/// must not retry on their own: retry policy belongs to the extraction engine
/// and is keyed on content validation, not on transport errors.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for a single prompt
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Trait for retrieving raw HTML from the legacy site
///
/// Implemented by the infrastructure layer (migrator-fetch)
pub trait PageFetcher {
    /// Error type for fetch operations
    type Error;

    /// Fetch the raw HTML body of `url`
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
