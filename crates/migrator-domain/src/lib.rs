//! Content Migrator Domain Layer
//!
//! Core value types shared by every stage of the migration pipeline, and the
//! trait interfaces for the two external services the pipeline talks to.
//!
//! ## Key Concepts
//!
//! - **SourceRow**: One line of the input sitemap table
//! - **PageMetadata**: What the pipeline learned about a successfully processed page
//! - **LlmProvider**: The generative model boundary
//! - **PageFetcher**: The legacy-site HTTP boundary
//!
//! ## Architecture
//!
//! This crate has no external dependencies. Infrastructure implementations
//! live in `migrator-llm` and `migrator-fetch`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod page;
pub mod traits;

// Re-exports for convenience
pub use page::{PageMetadata, SourceRow, UNCATEGORIZED};
pub use traits::{LlmProvider, PageFetcher};
