//! Frontmatter parsing and field editing
//!
//! A document is `<marker><frontmatter><marker><body>` where the marker is
//! `---`. Only the first two marker occurrences bound the frontmatter; a third
//! marker (a horizontal rule in the body, say) is ordinary body text.
//!
//! [`Document`] keeps the raw text of every region so that `parse` followed by
//! `to_string` reproduces the input byte-for-byte, and field edits only ever
//! touch the frontmatter region.

use std::fmt;
use tracing::warn;

/// Delimiter that opens and closes the frontmatter block
pub const FRONTMATTER_MARKER: &str = "---";

/// The text between the first two frontmatter markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    raw: String,
}

impl Frontmatter {
    /// Wrap a raw frontmatter region (the text between the markers)
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The raw region text, exactly as it appears between the markers
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Ordered `key: value` pairs, values as written (quotes included)
    ///
    /// Lines that are not `key: value` shaped are skipped.
    pub fn fields(&self) -> Vec<(String, String)> {
        self.raw
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                if key.is_empty() || key.contains(char::is_whitespace) {
                    return None;
                }
                Some((key.to_string(), value.trim().to_string()))
            })
            .collect()
    }

    /// First value for `key` with surrounding quotes removed
    pub fn get(&self, key: &str) -> Option<String> {
        find_field(&self.raw, key)
    }

    /// Append `key: value` as a new last line
    pub fn append(&mut self, key: &str, value: &str) {
        let mut raw = self.raw.trim_end().to_string();
        raw.push('\n');
        raw.push_str(&field_line(key, value));
        raw.push('\n');
        self.raw = raw;
    }

    /// Replace the first `key:` line, or append when there is none
    pub fn set(&mut self, key: &str, value: &str) {
        let mut rebuilt = String::with_capacity(self.raw.len() + value.len());
        let mut replaced = false;

        for line in self.raw.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            if !replaced && key_prefix(content, key).is_some() {
                rebuilt.push_str(&field_line(key, value));
                rebuilt.push_str(&line[content.len()..]);
                replaced = true;
            } else {
                rebuilt.push_str(line);
            }
        }

        if replaced {
            self.raw = rebuilt;
        } else {
            self.append(key, value);
        }
    }
}

/// A markdown document split into its frontmatter and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    preamble: String,
    frontmatter: Option<Frontmatter>,
    body: String,
}

impl Document {
    /// Split `text` on the first two frontmatter markers
    ///
    /// Text before the first marker is kept as a preamble so that
    /// re-serialization is lossless. With fewer than two markers the whole
    /// text is body.
    pub fn parse(text: &str) -> Self {
        let marker_len = FRONTMATTER_MARKER.len();
        let bounds = text.find(FRONTMATTER_MARKER).and_then(|open| {
            let region_start = open + marker_len;
            text[region_start..]
                .find(FRONTMATTER_MARKER)
                .map(|offset| (open, region_start, region_start + offset))
        });

        match bounds {
            Some((open, region_start, close)) => Self {
                preamble: text[..open].to_string(),
                frontmatter: Some(Frontmatter::from_raw(&text[region_start..close])),
                body: text[close + marker_len..].to_string(),
            },
            None => Self {
                preamble: String::new(),
                frontmatter: None,
                body: text.to_string(),
            },
        }
    }

    /// The frontmatter region, if the document has one
    pub fn frontmatter(&self) -> Option<&Frontmatter> {
        self.frontmatter.as_ref()
    }

    /// Everything after the closing marker (or the whole text without one)
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Append `key: value` to the frontmatter
    ///
    /// Without a frontmatter region a minimal one holding only this field is
    /// prepended to the document.
    pub fn add_field(&mut self, key: &str, value: &str) {
        match self.frontmatter.as_mut() {
            Some(frontmatter) => frontmatter.append(key, value),
            None => {
                warn!("Could not parse frontmatter, adding '{}' at top", key);
                let original = std::mem::take(&mut self.body);
                self.frontmatter = Some(Frontmatter::from_raw(format!(
                    "\n{}\n",
                    field_line(key, value)
                )));
                self.body = format!("\n\n{}", original);
            }
        }
    }

    /// Replace the first `key:` line in the frontmatter, appending when absent
    pub fn update_or_append_field(&mut self, key: &str, value: &str) {
        match self.frontmatter.as_mut() {
            Some(frontmatter) => frontmatter.set(key, value),
            None => self.add_field(key, value),
        }
    }

    /// Read `key` from the frontmatter, or from the whole text without one
    pub fn read_field(&self, key: &str) -> Option<String> {
        match &self.frontmatter {
            Some(frontmatter) => frontmatter.get(key),
            None => find_field(&self.body, key),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.frontmatter {
            Some(frontmatter) => write!(
                f,
                "{}{marker}{}{marker}{}",
                self.preamble,
                frontmatter.raw,
                self.body,
                marker = FRONTMATTER_MARKER
            ),
            None => f.write_str(&self.body),
        }
    }
}

/// Append `key: value` to the frontmatter of `doc`
///
/// # Examples
///
/// ```
/// use migrator_markdown::add_field;
///
/// let doc = "---\ntitle: Test\n---\n# Body\n";
/// assert_eq!(
///     add_field(doc, "extraction_date", "2025-01-31"),
///     "---\ntitle: Test\nextraction_date: 2025-01-31\n---\n# Body\n"
/// );
/// ```
pub fn add_field(doc: &str, key: &str, value: &str) -> String {
    let mut parsed = Document::parse(doc);
    parsed.add_field(key, value);
    parsed.to_string()
}

/// Replace or append `key: value` in the frontmatter of `doc`
pub fn update_or_append_field(doc: &str, key: &str, value: &str) -> String {
    let mut parsed = Document::parse(doc);
    parsed.update_or_append_field(key, value);
    parsed.to_string()
}

/// Read the first value of `key` from `doc`, quotes stripped
///
/// # Examples
///
/// ```
/// use migrator_markdown::read_field;
///
/// let doc = "---\ntitle: \"Register a Birth\"\n---\nBody\n";
/// assert_eq!(read_field(doc, "title").as_deref(), Some("Register a Birth"));
/// assert_eq!(read_field(doc, "description"), None);
/// ```
pub fn read_field(doc: &str, key: &str) -> Option<String> {
    Document::parse(doc).read_field(key)
}

/// Render `value` as a double-quoted scalar
///
/// ```
/// use migrator_markdown::quote_value;
///
/// assert_eq!(quote_value("Travel, ID and Citizenship"), "\"Travel, ID and Citizenship\"");
/// assert_eq!(quote_value(r#"The "Big" One"#), r#""The \"Big\" One""#);
/// ```
pub fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

fn field_line(key: &str, value: &str) -> String {
    format!("{}: {}", key, value)
}

/// Text after `key:` when `line` starts with it
fn key_prefix<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key)?.strip_prefix(':')
}

fn find_field(text: &str, key: &str) -> Option<String> {
    text.lines()
        .find_map(|line| key_prefix(line, key).and_then(unquote))
}

/// `\s*["']?(.+?)["']?\s*` applied to the text after the colon.
///
/// A value wrapped in double quotes also has the escapes written by
/// [`quote_value`] undone.
fn unquote(raw: &str) -> Option<String> {
    let mut value = raw.trim();
    if value.is_empty() {
        return None;
    }
    let double_quoted = value.len() > 1 && value.starts_with('"') && value.ends_with('"');
    if let Some(rest) = value.strip_prefix(['"', '\'']) {
        if !rest.is_empty() {
            value = rest;
        }
    }
    if let Some(rest) = value.strip_suffix(['"', '\'']) {
        if !rest.is_empty() {
            value = rest;
        }
    }
    let value = value.trim_end();
    if double_quoted {
        Some(unescape(value))
    } else {
        Some(value.to_string())
    }
}

/// Undo `\"` and `\\`; other backslashes are kept as written
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next)) if next == '"' || next == '\\' => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}
