//! Site-index builder
//!
//! Groups the metadata of every migrated page into an ordered list of
//! categories and writes it out as `content-ia.json`, the information
//! architecture file consumed by the new site.

#![warn(missing_docs)]

mod descriptions;

pub use descriptions::SectionDescriptions;

use migrator_domain::PageMetadata;
use migrator_markdown::slugify;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Default file name of the index artifact
pub const INDEX_FILE_NAME: &str = "content-ia.json";

/// Errors that can occur while writing the index
#[derive(Error, Debug)]
pub enum IndexError {
    /// The index could not be rendered as JSON
    #[error("Failed to serialize site index: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The index file could not be written
    #[error("Failed to write site index to {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// One page as listed in the index
///
/// The markdown filename is not part of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    /// Page title
    pub title: String,
    /// Page slug
    pub slug: String,
    /// Legacy page address
    pub source_url: String,
    /// Frontmatter description, possibly empty
    pub description: String,
    /// Run date (YYYY-MM-DD)
    pub extraction_date: String,
    /// Last-updated date, omitted when unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_date: Option<String>,
}

impl From<&PageMetadata> for PageEntry {
    fn from(page: &PageMetadata) -> Self {
        Self {
            title: page.title.clone(),
            slug: page.slug.clone(),
            source_url: page.source_url.clone(),
            description: page.description.clone(),
            extraction_date: page.extraction_date.clone(),
            last_updated_date: page.last_updated_date.clone(),
        }
    }
}

/// A section of the site and the pages filed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Section title exactly as it appeared in the source table
    pub title: String,
    /// Slug of `title`
    pub slug: String,
    /// Human-written summary, empty for unknown sections
    pub description: String,
    /// Pages in processing order
    pub pages: Vec<PageEntry>,
}

/// Ordered list of categories, serialized as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiteIndex {
    categories: Vec<Category>,
}

impl SiteIndex {
    /// Categories in first-seen order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by its title
    pub fn category(&self, title: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.title == title)
    }

    /// Total number of pages across all categories
    pub fn page_count(&self) -> usize {
        self.categories.iter().map(|c| c.pages.len()).sum()
    }

    /// Whether the index holds no pages
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Render the index as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, IndexError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the index to `path`, replacing any previous file
    pub fn write_to(&self, path: &Path) -> Result<(), IndexError> {
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Generated site index: {}", path.display());
        Ok(())
    }
}

/// Builds a [`SiteIndex`] from page metadata
#[derive(Debug, Clone, Default)]
pub struct SiteIndexBuilder {
    descriptions: SectionDescriptions,
}

impl SiteIndexBuilder {
    /// Create a builder resolving category descriptions from `descriptions`
    pub fn new(descriptions: SectionDescriptions) -> Self {
        Self { descriptions }
    }

    /// Group `pages` by section
    ///
    /// Sections keep the order in which they are first seen and pages keep
    /// their input order within a section.
    pub fn build(&self, pages: &[PageMetadata]) -> SiteIndex {
        let mut categories: Vec<Category> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for page in pages {
            let position = *positions.entry(page.section.as_str()).or_insert_with(|| {
                categories.push(self.category_for(&page.section));
                categories.len() - 1
            });
            categories[position].pages.push(PageEntry::from(page));
        }

        debug!(
            "Built site index: {} categories, {} pages",
            categories.len(),
            pages.len()
        );
        SiteIndex { categories }
    }

    fn category_for(&self, section: &str) -> Category {
        Category {
            title: section.to_string(),
            slug: slugify(section),
            description: self.descriptions.get(section).to_string(),
            pages: Vec::new(),
        }
    }
}
