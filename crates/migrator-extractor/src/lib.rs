//! Content Migrator Extractor
//!
//! Turns the raw HTML of a legacy page into markdown with frontmatter by
//! asking a generative model, then checks the answer for leftover HTML.
//!
//! # Architecture
//!
//! ```text
//! HTML → PromptBuilder → LLM → fence strip → URL sanitize → tag check
//!                         ↑                                    │
//!                         └──── corrective feedback ◄── tags found
//! ```
//!
//! # Retry policy
//!
//! - Leftover HTML tags trigger up to `max_retries` corrective attempts
//! - When attempts run out the last answer is accepted with a warning
//! - Model or transport failures are never retried here; they surface as
//!   [`ExtractorError::Llm`] or [`ExtractorError::Timeout`]
//!
//! # Example Usage
//!
//! ```no_run
//! use migrator_extractor::{Extractor, ExtractorConfig, PromptBuilder};
//! use migrator_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("---\ntitle: Test\n---\n# Test\n");
//! let prompt = PromptBuilder::new("Extract the main content of https://www.gov.bb/Citizens/apply-passport");
//! let extractor = Extractor::new(llm, prompt, ExtractorConfig::default());
//!
//! let extraction = extractor.extract("<html>...</html>", "https://example.test/page").await?;
//! println!("{} attempt(s), clean: {}", extraction.attempts, extraction.is_clean());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod types;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::{strip_outer_fence, validate_markdown};
pub use prompt::{PromptBuilder, EXAMPLE_URL_PLACEHOLDER};
pub use types::{AttemptOutcome, Extraction};
