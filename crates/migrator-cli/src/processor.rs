//! Per-row pipeline: fetch, extract, annotate, persist.

use crate::error::ProcessError;
use migrator_domain::{LlmProvider, PageFetcher, PageMetadata, SourceRow, UNCATEGORIZED};
use migrator_extractor::Extractor;
use migrator_markdown::{quote_value, slugify, Document};
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Title used when neither the row nor the model provides one
pub const UNTITLED: &str = "Untitled";

/// What happened to one source row
#[derive(Debug)]
pub enum PageOutcome {
    /// The row has no URL; counted neither as success nor failure
    Skipped,

    /// Fetch, extraction or persistence failed
    Failed {
        /// Row label for reporting
        label: String,
        /// Cause
        error: ProcessError,
    },

    /// The page was converted
    Succeeded {
        /// Metadata for the site index
        metadata: PageMetadata,
        /// False when a file with the same name already existed
        written: bool,
    },
}

impl PageOutcome {
    /// Whether the row counts as a success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Converts source rows into markdown files
pub struct PageProcessor<F, L>
where
    F: PageFetcher,
    L: LlmProvider,
{
    fetcher: F,
    extractor: Extractor<L>,
    output_dir: PathBuf,
    extraction_date: String,
}

impl<F, L> PageProcessor<F, L>
where
    F: PageFetcher,
    F::Error: Display,
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a processor writing into `output_dir`
    pub fn new(
        fetcher: F,
        extractor: Extractor<L>,
        output_dir: impl Into<PathBuf>,
        extraction_date: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            output_dir: output_dir.into(),
            extraction_date: extraction_date.into(),
        }
    }

    /// Process one row; errors are logged and returned as [`PageOutcome::Failed`]
    pub async fn process(&self, row: &SourceRow) -> PageOutcome {
        let Some(url) = row.old_url.as_deref() else {
            debug!("Skipping '{}' - no URL", row.label());
            return PageOutcome::Skipped;
        };

        info!("Processing: {}", row.label());
        info!("URL: {}", url);

        match self.convert(row, url).await {
            Ok(outcome) => outcome,
            Err(error) => {
                error!("Failed to process '{}': {}", row.label(), error);
                PageOutcome::Failed {
                    label: row.label().to_string(),
                    error,
                }
            }
        }
    }

    async fn convert(&self, row: &SourceRow, url: &str) -> Result<PageOutcome, ProcessError> {
        let html = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| ProcessError::Fetch(e.to_string()))?;

        let extraction = self.extractor.extract(&html, url).await?;
        if !extraction.is_clean() {
            warn!(
                "Keeping '{}' with {} leftover HTML tag(s)",
                row.label(),
                extraction.residual_tags.len()
            );
        }

        let mut document = Document::parse(&extraction.markdown);
        let metadata = annotate(&mut document, row, url, &self.extraction_date);

        let path = self.output_dir.join(&metadata.filename);
        let written = match write_new(&path, &document.to_string()) {
            Ok(()) => {
                info!("Saved: {}", path.display());
                true
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                info!("File already exists, skipping: {}", metadata.filename);
                false
            }
            Err(source) => return Err(ProcessError::Io { path, source }),
        };

        info!("Successfully processed: {}", metadata.title);
        Ok(PageOutcome::Succeeded { metadata, written })
    }
}

/// Stamp run data into the frontmatter and derive the page metadata.
///
/// Field order: `extraction_date`, `section`, `title`. The title is read back
/// afterwards so the row override (when present) wins.
pub fn annotate(
    document: &mut Document,
    row: &SourceRow,
    url: &str,
    extraction_date: &str,
) -> PageMetadata {
    document.update_or_append_field("extraction_date", extraction_date);
    if let Some(section) = &row.section {
        document.update_or_append_field("section", &quote_value(section));
    }
    if let Some(page_name) = &row.page_name {
        document.update_or_append_field("title", &quote_value(page_name));
    }

    let title = document
        .read_field("title")
        .unwrap_or_else(|| UNTITLED.to_string());
    let description = document.read_field("description").unwrap_or_default();
    let last_updated_date = document.read_field("last_updated");

    let mut slug = slugify(&title);
    if slug.is_empty() {
        slug = slugify(UNTITLED);
    }

    PageMetadata {
        filename: format!("{}.md", slug),
        slug,
        title,
        section: row
            .section
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        source_url: url.to_string(),
        description,
        extraction_date: extraction_date.to_string(),
        last_updated_date,
    }
}

/// Write `contents` to a file that must not exist yet
fn write_new(path: &Path, contents: &str) -> io::Result<()> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    write_or_discard(file, path, contents)
}

/// Fill `out`, removing `path` when the write fails
fn write_or_discard<W: Write>(mut out: W, path: &Path, contents: &str) -> io::Result<()> {
    if let Err(e) = out.write_all(contents.as_bytes()) {
        drop(out);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!("Could not remove partial file {}: {}", path.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}
