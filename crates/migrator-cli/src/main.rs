//! Content migrator - convert legacy site pages to markdown.

use chrono::Local;
use clap::Parser;
use migrator_cli::logging::init_logging;
use migrator_cli::{run_migration, Cli, MigrationConfig, RunContext};
use migrator_fetch::HttpFetcher;
use migrator_llm::GeminiProvider;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run() -> migrator_cli::Result<i32> {
    // The credential may live in .env; load it before clap reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = MigrationConfig::resolve(&cli)?;
    init_logging(&config.log_file)?;

    let extraction_date = Local::now().format("%Y-%m-%d").to_string();
    let ctx = RunContext::new(config, cli.api_key, extraction_date).map_err(|e| {
        error!("Startup failed: {}", e);
        e
    })?;

    let llm = GeminiProvider::new(&ctx.api_key, &ctx.model)?;
    let fetcher = HttpFetcher::new()?;

    let report = run_migration(&ctx, fetcher, llm).await?;
    Ok(report.exit_code())
}
