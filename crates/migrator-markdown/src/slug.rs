//! Slug generation for page titles

/// Convert text to a URL-friendly slug
///
/// Lower-cases the input, drops every character that is not a letter, digit,
/// underscore, whitespace or hyphen, collapses runs of whitespace and hyphens
/// into a single `-` and trims separators from both ends.
///
/// # Examples
///
/// ```
/// use migrator_markdown::slugify;
///
/// assert_eq!(slugify("Apply for a Passport"), "apply-for-a-passport");
/// assert_eq!(slugify("Travel, ID and Citizenship"), "travel-id-and-citizenship");
/// assert_eq!(slugify(""), "");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for c in lowered.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
        // Anything else is stripped without breaking the current word run.
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(slugify("Register a Birth"), "register-a-birth");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(slugify("What's new? (2024)"), "whats-new-2024");
        assert_eq!(slugify("Fees & Charges"), "fees-charges");
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(slugify("a  -- b\t\nc"), "a-b-c");
        assert_eq!(slugify("a - ! - b"), "a-b");
    }

    #[test]
    fn test_trims_separators() {
        assert_eq!(slugify("  --Leading and trailing--  "), "leading-and-trailing");
    }

    #[test]
    fn test_keeps_underscores() {
        assert_eq!(slugify("snake_case Title"), "snake_case-title");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify(" - "), "");
    }

    #[test]
    fn test_unicode_letters_survive() {
        assert_eq!(slugify("Café Société"), "café-société");
    }

    proptest! {
        #[test]
        fn prop_slugify_is_idempotent(text in "\\PC*") {
            let once = slugify(&text);
            prop_assert_eq!(slugify(&once), once);
        }

        #[test]
        fn prop_slug_has_no_edge_or_double_hyphens(text in "\\PC*") {
            let slug = slugify(&text);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert!(!slug.chars().any(char::is_whitespace));
        }
    }
}
