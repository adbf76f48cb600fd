//! Page module - the records that flow through a migration run

use std::fmt;

/// Section label used when a source row carries no section
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One record of the input sitemap table
///
/// Rows are immutable once read. Every field is whitespace-trimmed and an
/// empty value is stored as `None`, so "absent" and "blank" mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceRow {
    /// Display title override
    pub page_name: Option<String>,

    /// Category label
    pub section: Option<String>,

    /// Address of the legacy page
    pub old_url: Option<String>,
}

impl SourceRow {
    /// Create a row from raw table cells
    ///
    /// # Examples
    ///
    /// ```
    /// use migrator_domain::SourceRow;
    ///
    /// let row = SourceRow::new("  Apply for a Passport ", "", "https://example.test/passport");
    /// assert_eq!(row.page_name.as_deref(), Some("Apply for a Passport"));
    /// assert_eq!(row.section, None);
    /// ```
    pub fn new(page_name: &str, section: &str, old_url: &str) -> Self {
        Self {
            page_name: non_blank(page_name),
            section: non_blank(section),
            old_url: non_blank(old_url),
        }
    }

    /// Whether the row can be processed at all
    pub fn has_url(&self) -> bool {
        self.old_url.is_some()
    }

    /// Human-readable label for log lines: the page name, else the URL
    pub fn label(&self) -> &str {
        self.page_name
            .as_deref()
            .or(self.old_url.as_deref())
            .unwrap_or("<unnamed row>")
    }
}

impl fmt::Display for SourceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// What the pipeline learned about one successfully processed page
///
/// Created by the page processor, accumulated by the driver and consumed
/// once by the site-index builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    /// Final page title (row override wins over the model's title)
    pub title: String,

    /// Slug derived from `title`
    pub slug: String,

    /// Name of the markdown artifact (`<slug>.md`)
    pub filename: String,

    /// Section label, `UNCATEGORIZED` when the row had none
    pub section: String,

    /// Legacy page address
    pub source_url: String,

    /// Frontmatter description, empty when absent
    pub description: String,

    /// Run start date (YYYY-MM-DD)
    pub extraction_date: String,

    /// Last-updated date found in the frontmatter, if any
    pub last_updated_date: Option<String>,
}
