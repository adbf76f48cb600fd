//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::validate_markdown;
use crate::prompt::PromptBuilder;
use crate::types::{AttemptOutcome, AttemptState, Extraction};
use migrator_domain::LlmProvider;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// The Extractor converts page HTML into markdown through an LLM
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    prompt_builder: PromptBuilder,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, prompt_builder: PromptBuilder, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            prompt_builder,
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The underlying provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Extract markdown for the page at `url` from its `html`
    ///
    /// Makes at most `max_retries + 1` model calls. An answer with leftover
    /// HTML is retried with corrective feedback while attempts remain; the
    /// last answer is accepted (with `residual_tags` set) once they run out.
    ///
    /// # Errors
    ///
    /// - [`ExtractorError::HtmlTooLong`] before any model call
    /// - [`ExtractorError::Llm`] / [`ExtractorError::Timeout`] as soon as a
    ///   model call fails; these are not retried
    pub async fn extract(&self, html: &str, url: &str) -> Result<Extraction, ExtractorError> {
        if html.len() > self.config.max_html_length {
            return Err(ExtractorError::HtmlTooLong(
                html.len(),
                self.config.max_html_length,
            ));
        }

        let max_attempts = self.config.max_attempts();
        let mut state = AttemptState::default();

        while state.attempts() < max_attempts {
            let attempt = state.attempts() + 1;
            let instruction = self
                .prompt_builder
                .corrective_instruction(url, state.last_failure());
            let prompt = self.prompt_builder.build(&instruction, html);

            info!(
                "Calling model for content extraction (attempt {}/{})",
                attempt, max_attempts
            );
            debug!("Prompt length: {} chars", prompt.len());

            let response = self.call_llm(&prompt).await?;

            debug!("LLM response length: {} chars", response.len());

            match validate_markdown(&response) {
                AttemptOutcome::Success { markdown } => {
                    if attempt > 1 {
                        info!("Clean markdown after {} attempts", attempt);
                    }
                    return Ok(state.succeed(markdown));
                }
                AttemptOutcome::ValidationFailure {
                    markdown,
                    tags_found,
                } => {
                    let listed = tags_found.iter().cloned().collect::<Vec<_>>().join(", ");
                    state = state.record_failure(markdown, tags_found);

                    if state.attempts() < max_attempts {
                        warn!(
                            "HTML tags detected in output: {} (attempt {}/{}), retrying with feedback",
                            listed, attempt, max_attempts
                        );
                        sleep(self.config.retry_delay()).await;
                    }
                }
            }
        }

        let extraction = state.exhaust();
        warn!(
            "HTML tags still present after {} attempts: {}; keeping last output",
            extraction.attempts,
            extraction
                .residual_tags
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(extraction)
    }

    /// Call the LLM provider once, bounded by the extraction timeout
    async fn call_llm(&self, prompt: &str) -> Result<String, ExtractorError> {
        timeout(
            self.config.extraction_timeout(),
            self.llm_provider.generate(prompt),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.config.extraction_timeout_secs))?
        .map_err(|e| ExtractorError::Llm(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrator_llm::MockProvider;

    fn create_test_extractor(llm: MockProvider) -> Extractor<MockProvider> {
        let config = ExtractorConfig {
            retry_delay_ms: 0,
            ..ExtractorConfig::default()
        };
        Extractor::new(llm, PromptBuilder::new("Extract main content."), config)
    }

    #[tokio::test]
    async fn test_clean_first_attempt() {
        let extractor = create_test_extractor(MockProvider::new("# Clean\n"));

        let extraction = extractor.extract("<html></html>", "https://example.test").await.unwrap();
        assert_eq!(extraction.markdown, "# Clean\n");
        assert_eq!(extraction.attempts, 1);
        assert!(extraction.is_clean());
        assert_eq!(extractor.provider().call_count(), 1);
    }

    #[tokio::test]
    async fn test_html_too_long() {
        let llm = MockProvider::new("# Clean\n");
        let config = ExtractorConfig {
            max_html_length: 10,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(llm, PromptBuilder::new("x"), config);

        let result = extractor.extract(&"a".repeat(11), "https://example.test").await;
        assert!(matches!(result, Err(ExtractorError::HtmlTooLong(11, 10))));
        assert_eq!(extractor.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_llm_error_is_not_retried() {
        let llm = MockProvider::default();
        llm.fail_on("Extract main content.\n\n<html></html>");
        let extractor = create_test_extractor(llm);

        let result = extractor.extract("<html></html>", "https://example.test").await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
        assert_eq!(extractor.provider().call_count(), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_accepts_first_output() {
        let llm = MockProvider::new("<div>x</div>");
        let config = ExtractorConfig {
            max_retries: 0,
            retry_delay_ms: 0,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(llm, PromptBuilder::new("x"), config);

        let extraction = extractor.extract("<p/>", "https://example.test").await.unwrap();
        assert_eq!(extraction.attempts, 1);
        assert_eq!(extraction.markdown, "<div>x</div>");
        assert!(!extraction.is_clean());
    }
}
