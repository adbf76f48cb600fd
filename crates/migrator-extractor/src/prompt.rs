//! Prompt assembly for content extraction

use std::collections::BTreeSet;

/// Example page address written into the prompt template
///
/// Every occurrence is replaced with the address of the page being extracted.
pub const EXAMPLE_URL_PLACEHOLDER: &str = "https://www.gov.bb/Citizens/apply-passport";

/// Builds extraction prompts from a template document
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
    placeholder: String,
}

impl PromptBuilder {
    /// Create a builder around `template` using the default URL placeholder
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            placeholder: EXAMPLE_URL_PLACEHOLDER.to_string(),
        }
    }

    /// Use a different placeholder URL
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Base instruction for `url`: the template with the placeholder replaced
    pub fn instruction(&self, url: &str) -> String {
        self.template.replace(&self.placeholder, url)
    }

    /// Base instruction extended with a correction request naming `tags`
    pub fn corrective_instruction(&self, url: &str, tags: &BTreeSet<String>) -> String {
        let mut instruction = self.instruction(url);
        if tags.is_empty() {
            return instruction;
        }

        let listed: Vec<String> = tags.iter().map(|tag| format!("<{}>", tag)).collect();
        instruction.push_str("\n\nIMPORTANT - CORRECTION REQUIRED:\n");
        instruction.push_str(&format!(
            "Your previous response contained raw HTML tags: {}.\n",
            listed.join(", ")
        ));
        instruction.push_str(FEEDBACK_INSTRUCTIONS);
        instruction
    }

    /// Complete prompt: instruction followed by the page HTML
    pub fn build(&self, instruction: &str, html: &str) -> String {
        format!("{}\n\n{}", instruction, html)
    }
}

const FEEDBACK_INSTRUCTIONS: &str = "Return the content as pure markdown only. \
Convert every HTML element to its markdown equivalent (headings, lists, links, tables, emphasis) \
and do not emit any HTML tags outside fenced code blocks.";

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "Extract the main content.\nsource_url: https://www.gov.bb/Citizens/apply-passport\nReturn markdown.";

    #[test]
    fn test_instruction_substitutes_url() {
        let builder = PromptBuilder::new(TEMPLATE);
        let instruction = builder.instruction("https://example.test/passport");
        assert!(instruction.contains("source_url: https://example.test/passport"));
        assert!(!instruction.contains(EXAMPLE_URL_PLACEHOLDER));
    }

    #[test]
    fn test_instruction_without_placeholder_is_template() {
        let builder = PromptBuilder::new("No placeholder here");
        assert_eq!(builder.instruction("https://example.test"), "No placeholder here");
    }

    #[test]
    fn test_custom_placeholder() {
        let builder = PromptBuilder::new("Page: {{URL}}").with_placeholder("{{URL}}");
        assert_eq!(builder.instruction("https://example.test/a"), "Page: https://example.test/a");
    }

    #[test]
    fn test_build_appends_html() {
        let builder = PromptBuilder::new(TEMPLATE);
        let prompt = builder.build("Instruction", "<html><body>x</body></html>");
        assert_eq!(prompt, "Instruction\n\n<html><body>x</body></html>");
    }

    #[test]
    fn test_corrective_instruction_names_every_tag() {
        let builder = PromptBuilder::new(TEMPLATE);
        let tags: BTreeSet<String> = ["div", "span"].iter().map(|s| s.to_string()).collect();
        let instruction = builder.corrective_instruction("https://example.test/x", &tags);

        assert!(instruction.starts_with(&builder.instruction("https://example.test/x")));
        assert!(instruction.contains("CORRECTION REQUIRED"));
        assert!(instruction.contains("<div>, <span>"));
        assert!(instruction.contains("pure markdown"));
    }

    #[test]
    fn test_corrective_instruction_without_tags_is_base() {
        let builder = PromptBuilder::new(TEMPLATE);
        let instruction = builder.corrective_instruction("https://example.test/x", &BTreeSet::new());
        assert_eq!(instruction, builder.instruction("https://example.test/x"));
    }
}
