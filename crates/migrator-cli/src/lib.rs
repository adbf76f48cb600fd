//! Content migrator CLI library.
//!
//! Wires the fetcher, extraction engine, frontmatter editing and site-index
//! builder into a sequential migration run driven by a sitemap CSV.

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod processor;
pub mod source;

pub use cli::Cli;
pub use config::{MigrationConfig, RunContext};
pub use driver::{Migration, MigrationReport};
pub use error::{CliError, ProcessError, Result, StartupError};
pub use processor::{PageOutcome, PageProcessor};

use migrator_domain::{LlmProvider, PageFetcher};
use migrator_extractor::{Extractor, PromptBuilder};
use std::fmt::Display;
use tracing::info;

/// Read the sitemap named by `ctx` and migrate every row with `fetcher` and
/// `llm`.
pub async fn run_migration<F, L>(ctx: &RunContext, fetcher: F, llm: L) -> Result<MigrationReport>
where
    F: PageFetcher,
    F::Error: Display,
    L: LlmProvider,
    L::Error: Display,
{
    info!("Starting migration...");
    info!("CSV file: {}", ctx.csv_path.display());
    info!("Output directory: {}", ctx.output_dir.display());
    info!("Extraction date: {}", ctx.extraction_date);
    if let Some(limit) = ctx.limit {
        info!("Limit: {} pages", limit);
    }

    let rows = source::read_rows(&ctx.csv_path)?;

    let extractor = Extractor::new(
        llm,
        PromptBuilder::new(ctx.prompt_template.clone()),
        ctx.extractor.clone(),
    );
    let processor = PageProcessor::new(fetcher, extractor, &ctx.output_dir, &ctx.extraction_date);

    Migration::new(ctx, processor).run(rows).await
}
