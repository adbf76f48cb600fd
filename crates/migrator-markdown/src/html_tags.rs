//! Detection of raw HTML left behind in rendered markdown

use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Opening, closing or self-closing tag: `<name ...>`, `</name>`, `<name/>`
///
/// The name must be followed by whitespace, `/` or `>` so that autolinks such
/// as `<https://example.test>` are not mistaken for tags.
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?([A-Za-z][A-Za-z0-9-]*)(?:\s[^<>]*)?/?>").expect("html tag pattern is valid")
});

const FENCE: &str = "```";
const INDENTED_CODE: &str = "    ";

/// Collect the lower-cased names of HTML tags found outside code
///
/// Lines are scanned one at a time. A line whose trimmed content starts with a
/// triple-backtick fence toggles the fenced state; fenced content, fence lines
/// and lines indented by four spaces are skipped. Inline code spans are blanked
/// out before matching. The result is a validation signal only; nothing is
/// stripped from the input.
///
/// # Examples
///
/// ```
/// use migrator_markdown::detect_html_tags;
///
/// let tags = detect_html_tags("<p>Hello</p>\n");
/// assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["p".to_string()]);
/// ```
pub fn detect_html_tags(markdown: &str) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        if line.trim().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || line.starts_with(INDENTED_CODE) {
            continue;
        }

        let text = strip_code_spans(line);
        for caps in HTML_TAG.captures_iter(&text) {
            tags.insert(caps[1].to_ascii_lowercase());
        }
    }

    tags
}

/// Blank out backtick code spans on a single line
///
/// A run of N backticks opens a span that closes at the next run of exactly N
/// backticks. An unmatched run is kept as literal text.
fn strip_code_spans(line: &str) -> Cow<'_, str> {
    if !line.contains('`') {
        return Cow::Borrowed(line);
    }

    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            let next = line[i..].find('`').map_or(line.len(), |off| i + off);
            out.push_str(&line[i..next]);
            i = next;
            continue;
        }

        let run = backtick_run(bytes, i);
        match find_closing_run(bytes, i + run, run) {
            Some(close) => {
                out.push(' ');
                i = close + run;
            }
            None => {
                out.push_str(&line[i..i + run]);
                i += run;
            }
        }
    }

    Cow::Owned(out)
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

fn find_closing_run(bytes: &[u8], mut pos: usize, len: usize) -> Option<usize> {
    while pos < bytes.len() {
        if bytes[pos] == b'`' {
            let run = backtick_run(bytes, pos);
            if run == len {
                return Some(pos);
            }
            pos += run;
        } else {
            pos += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tags: BTreeSet<String>) -> Vec<String> {
        tags.into_iter().collect()
    }

    #[test]
    fn test_simple_paragraph_tag() {
        assert_eq!(names(detect_html_tags("<p>Hello</p>\n")), vec!["p"]);
    }

    #[test]
    fn test_pure_markdown_is_clean() {
        let md = "---\ntitle: Test\n---\n\n# Heading\n\nSome *text* with a [link](https://example.test).\n";
        assert!(detect_html_tags(md).is_empty());
    }

    #[test]
    fn test_fenced_and_inline_code_ignored() {
        let md = "Use `<div>` inline? No:\n```\n<div>real tag</div>\n```\n";
        assert!(detect_html_tags(md).is_empty());
    }

    #[test]
    fn test_indented_code_ignored() {
        let md = "Example:\n\n    <table><tr><td>x</td></tr></table>\n";
        assert!(detect_html_tags(md).is_empty());
    }

    #[test]
    fn test_tags_after_fence_closes_are_detected() {
        let md = "```html\n<span>in code</span>\n```\n<span>outside</span>\n";
        assert_eq!(names(detect_html_tags(md)), vec!["span"]);
    }

    #[test]
    fn test_case_folding_and_attributes() {
        let md = "<DIV class=\"x\">a</DIV>\n<a href=\"/y\">b</a><br/>\n<img src=\"z.png\" />\n";
        assert_eq!(names(detect_html_tags(md)), vec!["a", "br", "div", "img"]);
    }

    #[test]
    fn test_autolinks_and_comparisons_not_tags() {
        let md = "Visit <https://example.test> or mail <info@example.test>.\nIf a < b and c > d.\n";
        assert!(detect_html_tags(md).is_empty());
    }

    #[test]
    fn test_unclosed_backtick_keeps_text() {
        let md = "odd ` backtick <em>kept</em>\n";
        assert_eq!(names(detect_html_tags(md)), vec!["em"]);
    }

    #[test]
    fn test_double_backtick_span() {
        assert!(detect_html_tags("``a ` <b>`` done\n").is_empty());
    }

    #[test]
    fn test_strip_code_spans_borrowed_when_no_backticks() {
        assert!(matches!(strip_code_spans("plain"), Cow::Borrowed("plain")));
    }
}
