//! Result types for extraction

use std::collections::BTreeSet;

/// Result of validating one model answer
///
/// Transport failures are not represented here; they are the `Err` side of
/// the model call and never reach validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The answer contains no raw HTML
    Success {
        /// Normalized markdown
        markdown: String,
    },

    /// The answer still contains raw HTML tags
    ValidationFailure {
        /// Normalized markdown, kept as the best effort so far
        markdown: String,
        /// Lower-cased names of the tags found
        tags_found: BTreeSet<String>,
    },
}

impl AttemptOutcome {
    /// Normalized markdown carried by either variant
    pub fn markdown(&self) -> &str {
        match self {
            Self::Success { markdown } | Self::ValidationFailure { markdown, .. } => markdown,
        }
    }

    /// Whether the answer passed validation
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Markdown produced for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The accepted markdown (possibly still containing HTML, see `residual_tags`)
    pub markdown: String,

    /// Number of model calls made
    pub attempts: u32,

    /// Tags left in `markdown` when attempts ran out; empty on success
    pub residual_tags: BTreeSet<String>,
}

impl Extraction {
    /// Whether the accepted markdown is free of raw HTML
    pub fn is_clean(&self) -> bool {
        self.residual_tags.is_empty()
    }
}

/// Accumulator threaded through the retry loop
///
/// Holds the output and failing tags of the most recent attempt only, so a
/// result built from it can never mix data from different attempts.
#[derive(Debug, Default)]
pub(crate) struct AttemptState {
    attempts: u32,
    last_output: String,
    last_failure: BTreeSet<String>,
}

impl AttemptState {
    /// Number of attempts recorded so far
    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Tags that failed the previous attempt (empty before the first failure)
    pub(crate) fn last_failure(&self) -> &BTreeSet<String> {
        &self.last_failure
    }

    /// Record a failed attempt, replacing the previous one
    pub(crate) fn record_failure(self, markdown: String, tags_found: BTreeSet<String>) -> Self {
        Self {
            attempts: self.attempts + 1,
            last_output: markdown,
            last_failure: tags_found,
        }
    }

    /// Finish with a clean answer
    pub(crate) fn succeed(self, markdown: String) -> Extraction {
        Extraction {
            markdown,
            attempts: self.attempts + 1,
            residual_tags: BTreeSet::new(),
        }
    }

    /// Finish with the last failed answer once attempts are exhausted
    pub(crate) fn exhaust(self) -> Extraction {
        Extraction {
            markdown: self.last_output,
            attempts: self.attempts,
            residual_tags: self.last_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_state_keeps_only_latest_failure() {
        let state = AttemptState::default()
            .record_failure("first".to_string(), tags(&["div", "span"]))
            .record_failure("second".to_string(), tags(&["p"]));

        assert_eq!(state.attempts(), 2);
        assert_eq!(state.last_failure(), &tags(&["p"]));

        let extraction = state.exhaust();
        assert_eq!(extraction.markdown, "second");
        assert_eq!(extraction.residual_tags, tags(&["p"]));
        assert!(!extraction.is_clean());
    }

    #[test]
    fn test_succeed_counts_the_final_attempt() {
        let extraction = AttemptState::default()
            .record_failure("bad".to_string(), tags(&["div"]))
            .succeed("good".to_string());

        assert_eq!(extraction.attempts, 2);
        assert_eq!(extraction.markdown, "good");
        assert!(extraction.is_clean());
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = AttemptOutcome::Success {
            markdown: "a".to_string(),
        };
        let bad = AttemptOutcome::ValidationFailure {
            markdown: "b".to_string(),
            tags_found: tags(&["div"]),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
        assert_eq!(ok.markdown(), "a");
        assert_eq!(bad.markdown(), "b");
    }
}
