//! Link and image target sanitization

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// The `(...)` target that follows a link or image label
static LINK_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\(([^)\n]*)\)").expect("link target pattern is valid"));

/// A destination followed by an optional quoted link title
static TITLED_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(.*?)(\s+(?:"[^"]*"|'[^']*'))$"#).expect("titled target pattern is valid")
});

/// Percent-encode spaces inside markdown link and image targets
///
/// A target is rewritten only when its destination contains a space or one of
/// `[ ] ( )`; in that case spaces become `%20`. Other unsafe characters are
/// left alone. A trailing quoted link title is kept as written.
///
/// # Examples
///
/// ```
/// use migrator_markdown::sanitize_markdown_urls;
///
/// let md = "See [the form](https://example.test/Application Form.pdf).";
/// assert_eq!(
///     sanitize_markdown_urls(md),
///     "See [the form](https://example.test/Application%20Form.pdf)."
/// );
/// ```
pub fn sanitize_markdown_urls(markdown: &str) -> String {
    LINK_TARGET
        .replace_all(markdown, |caps: &Captures<'_>| {
            format!("]({})", sanitize_target(&caps[1]))
        })
        .into_owned()
}

fn sanitize_target(target: &str) -> String {
    let (destination, title) = match TITLED_TARGET.captures(target) {
        Some(caps) if !caps[1].trim().is_empty() => (
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
        ),
        _ => (target, ""),
    };

    if !needs_encoding(destination) {
        return target.to_string();
    }

    format!("{}{}", destination.replace(' ', "%20"), title)
}

fn needs_encoding(destination: &str) -> bool {
    destination
        .chars()
        .any(|c| matches!(c, ' ' | '[' | ']' | '(' | ')'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_targets_untouched() {
        let md = "[Home](https://example.test/) and ![logo](/img/logo.png)";
        assert_eq!(sanitize_markdown_urls(md), md);
    }

    #[test]
    fn test_image_target_with_spaces() {
        let md = "![Coat of arms](/media files/coat of arms.png)";
        assert_eq!(
            sanitize_markdown_urls(md),
            "![Coat of arms](/media%20files/coat%20of%20arms.png)"
        );
    }

    #[test]
    fn test_multiple_links_on_one_line() {
        let md = "[a](x y) then [b](z) then [c](p q r)";
        assert_eq!(sanitize_markdown_urls(md), "[a](x%20y) then [b](z) then [c](p%20q%20r)");
    }

    #[test]
    fn test_bracket_without_space_is_left_as_is() {
        // Only spaces are rewritten; brackets are a known limitation.
        let md = "[doc](https://example.test/file[1].pdf)";
        assert_eq!(sanitize_markdown_urls(md), md);
    }

    #[test]
    fn test_link_title_preserved() {
        let md = r#"[form](https://example.test/a form.pdf "Download the form")"#;
        assert_eq!(
            sanitize_markdown_urls(md),
            r#"[form](https://example.test/a%20form.pdf "Download the form")"#
        );
    }

    #[test]
    fn test_clean_destination_with_title_untouched() {
        let md = "[x](https://example.test/x 'title')";
        assert_eq!(sanitize_markdown_urls(md), md);
    }

    #[test]
    fn test_image_nested_in_link() {
        let md = "[![badge](/a b.png)](https://example.test/c d)";
        assert_eq!(
            sanitize_markdown_urls(md),
            "[![badge](/a%20b.png)](https://example.test/c%20d)"
        );
    }

    #[test]
    fn test_plain_parentheses_not_links() {
        let md = "Office hours (8:30 am to 4:30 pm)";
        assert_eq!(sanitize_markdown_urls(md), md);
    }
}
