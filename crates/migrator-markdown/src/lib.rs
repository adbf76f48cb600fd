//! Markdown text utilities for the content migrator
//!
//! Pure text transforms applied to model output before it is persisted:
//!
//! - [`slugify`]: titles to URL-safe identifiers
//! - [`sanitize_markdown_urls`]: percent-encode spaces in link and image targets
//! - [`detect_html_tags`]: find raw HTML that leaked into rendered markdown
//! - [`frontmatter`]: parse and edit the leading `---` metadata block
//!
//! Nothing in this crate performs I/O.

#![warn(missing_docs)]

pub mod frontmatter;
mod html_tags;
mod links;
mod slug;

pub use frontmatter::{
    add_field, quote_value, read_field, update_or_append_field, Document, Frontmatter,
    FRONTMATTER_MARKER,
};
pub use html_tags::detect_html_tags;
pub use links::sanitize_markdown_urls;
pub use slug::slugify;
