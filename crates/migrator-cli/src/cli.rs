//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Content migrator - Move legacy site pages to markdown with an LLM.
///
/// Reads the page sitemap CSV, fetches every listed page, asks the model for
/// the main content as markdown with frontmatter and writes one file per page
/// plus a `content-ia.json` site index.
#[derive(Debug, Default, Parser)]
#[command(name = "content-migrator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Limit processing to the first N pages with a URL
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sitemap CSV with `Page names`, `Section` and `Old URL` columns
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Prompt template file
    #[arg(long)]
    pub prompt: Option<PathBuf>,

    /// Directory for markdown files and the site index
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log file (appended to)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Gemini model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Corrective attempts per page when the output still contains HTML
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Pause between pages in seconds
    #[arg(long)]
    pub delay_secs: Option<u64>,

    /// Google Generative Language API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}
