//! Normalize and validate model output

use crate::types::AttemptOutcome;
use migrator_markdown::{detect_html_tags, sanitize_markdown_urls};

/// Remove a code fence wrapping the entire response
///
/// Models sometimes answer with the whole document inside
/// ```` ```markdown ... ``` ````. The opening fence must be closed by the last
/// line and by no earlier one; responses that merely contain fenced blocks
/// are returned unchanged.
pub fn strip_outer_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return response;
    }

    let Some(first_newline) = trimmed.find('\n') else {
        return response;
    };
    let inner = &trimmed[first_newline + 1..];

    // The first fence line after the opener closes it; it has to be the last line
    let mut offset = 0;
    for line in inner.split_inclusive('\n') {
        let end = offset + line.len();
        if line.trim_start().starts_with("```") {
            if end == inner.len() && line.trim() == "```" {
                return &inner[..offset];
            }
            return response;
        }
        offset = end;
    }

    response
}

/// Sanitize link targets and check the result for raw HTML
pub fn validate_markdown(response: &str) -> AttemptOutcome {
    let markdown = sanitize_markdown_urls(strip_outer_fence(response));
    let tags_found = detect_html_tags(&markdown);

    if tags_found.is_empty() {
        AttemptOutcome::Success { markdown }
    } else {
        AttemptOutcome::ValidationFailure {
            markdown,
            tags_found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fence_with_language() {
        let response = "```markdown\n---\ntitle: A\n---\n# A\n```";
        assert_eq!(strip_outer_fence(response), "---\ntitle: A\n---\n# A\n");
    }

    #[test]
    fn test_strip_fence_without_language() {
        let response = "\n```\n# Heading\n```\n";
        assert_eq!(strip_outer_fence(response), "# Heading\n");
    }

    #[test]
    fn test_unwrapped_response_untouched() {
        let response = "---\ntitle: A\n---\n\n```\ncode\n```\n";
        assert_eq!(strip_outer_fence(response), response);
    }

    #[test]
    fn test_single_line_fence_untouched() {
        assert_eq!(strip_outer_fence("```inline```"), "```inline```");
    }

    #[test]
    fn test_separate_blocks_are_not_one_wrapper() {
        let response = "```\ncode one\n```\n\n<div>stray</div>\n\n```\ncode two\n```";
        assert_eq!(strip_outer_fence(response), response);
    }

    #[test]
    fn test_unclosed_fence_untouched() {
        let response = "```markdown\n# Title\n";
        assert_eq!(strip_outer_fence(response), response);
    }

    #[test]
    fn test_html_between_blocks_is_reported() {
        let outcome =
            validate_markdown("```\ncode one\n```\n\n<div>stray</div>\n\n```\ncode two\n```");
        match outcome {
            AttemptOutcome::ValidationFailure { markdown, tags_found } => {
                assert!(markdown.starts_with("```\ncode one"));
                assert!(tags_found.contains("div"));
            }
            other => panic!("Expected ValidationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_clean_markdown() {
        let outcome = validate_markdown("# Title\n\n[form](/a b.pdf)\n");
        assert_eq!(
            outcome,
            AttemptOutcome::Success {
                markdown: "# Title\n\n[form](/a%20b.pdf)\n".to_string()
            }
        );
    }

    #[test]
    fn test_validate_reports_tags() {
        match validate_markdown("<div>Hello</div>\n<br>\n") {
            AttemptOutcome::ValidationFailure { tags_found, .. } => {
                let tags: Vec<_> = tags_found.into_iter().collect();
                assert_eq!(tags, vec!["br", "div"]);
            }
            other => panic!("Expected ValidationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_fenced_response_is_unwrapped() {
        let outcome = validate_markdown("```markdown\n# Clean\n```");
        assert_eq!(outcome.markdown(), "# Clean\n");
        assert!(outcome.is_success());
    }
}
