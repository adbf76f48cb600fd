//! Migration driver: runs the processor over every row and writes the index.

use crate::config::RunContext;
use crate::error::Result;
use crate::processor::{PageOutcome, PageProcessor};
use migrator_domain::{LlmProvider, PageFetcher, PageMetadata, SourceRow};
use migrator_index::SiteIndexBuilder;
use std::fmt::Display;
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{error, info};

const RULE: &str = "================================================================================";

/// Counts and metadata gathered over a run
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Rows converted (including those whose file already existed)
    pub success: usize,
    /// Rows that failed
    pub failure: usize,
    /// Rows without a URL
    pub skipped: usize,
    /// Markdown files created by this run
    pub written: usize,
    /// Metadata of every successful row, in processing order
    pub pages: Vec<PageMetadata>,
    /// Site index path, when one was written
    pub index_file: Option<PathBuf>,
}

impl MigrationReport {
    /// Rows that were attempted
    pub fn total(&self) -> usize {
        self.success + self.failure
    }

    /// Process exit status: 0 when nothing failed
    pub fn exit_code(&self) -> i32 {
        if self.failure == 0 {
            0
        } else {
            1
        }
    }

    fn record(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Skipped => self.skipped += 1,
            PageOutcome::Failed { .. } => self.failure += 1,
            PageOutcome::Succeeded { metadata, written } => {
                self.success += 1;
                if written {
                    self.written += 1;
                }
                self.pages.push(metadata);
            }
        }
    }
}

/// One migration run over a set of rows
pub struct Migration<'a, F, L>
where
    F: PageFetcher,
    L: LlmProvider,
{
    ctx: &'a RunContext,
    processor: PageProcessor<F, L>,
}

impl<'a, F, L> Migration<'a, F, L>
where
    F: PageFetcher,
    F::Error: Display,
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a run
    pub fn new(ctx: &'a RunContext, processor: PageProcessor<F, L>) -> Self {
        Self { ctx, processor }
    }

    /// Process `rows` in order and write the site index.
    ///
    /// Rows without a URL are dropped before counting; `limit` applies to the
    /// rest. The summary is logged even when the index cannot be written.
    pub async fn run(&self, rows: Vec<SourceRow>) -> Result<MigrationReport> {
        let mut rows: Vec<SourceRow> = rows.into_iter().filter(SourceRow::has_url).collect();
        info!("Found {} pages with URLs", rows.len());

        if let Some(limit) = self.ctx.limit {
            rows.truncate(limit);
            info!("Processing first {} pages", rows.len());
        }

        let mut report = MigrationReport::default();
        let count = rows.len();

        for (i, row) in rows.iter().enumerate() {
            info!("{}", RULE);
            info!("[{}/{}]", i + 1, count);

            report.record(self.processor.process(row).await);

            if i + 1 < count {
                sleep(self.ctx.row_delay).await;
            }
        }

        let index_result = if report.pages.is_empty() {
            Ok(())
        } else {
            let path = self.ctx.index_path();
            let index = SiteIndexBuilder::new(self.ctx.section_descriptions.clone())
                .build(&report.pages);
            match index.write_to(&path) {
                Ok(()) => {
                    report.index_file = Some(path);
                    Ok(())
                }
                Err(e) => {
                    error!("{}", e);
                    Err(e)
                }
            }
        };

        self.log_summary(&report);
        index_result?;
        Ok(report)
    }

    fn log_summary(&self, report: &MigrationReport) {
        info!("{}", RULE);
        info!("Migration complete!");
        info!("Successful: {}", report.success);
        info!("Failed: {}", report.failure);
        info!("Total: {}", report.total());
        info!("Output directory: {}", self.ctx.output_dir.display());
        info!("Log file: {}", self.ctx.log_file.display());
        if let Some(index_file) = &report.index_file {
            info!("Site index file: {}", index_file.display());
        }
    }
}
