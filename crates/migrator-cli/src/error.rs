//! Error types for the migration CLI.

use migrator_extractor::ExtractorError;
use migrator_fetch::FetchError;
use migrator_index::IndexError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Fatal problems detected before any row is processed.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The model API key is not set
    #[error("GOOGLE_API_KEY not found in environment or .env file")]
    MissingCredential,

    /// The input table does not exist
    #[error("CSV file not found: {}", .0.display())]
    MissingCsv(PathBuf),

    /// The prompt template does not exist
    #[error("Prompt file not found: {}", .0.display())]
    MissingPrompt(PathBuf),

    /// The input table exists but cannot be parsed
    #[error("Failed to read CSV {}: {message}", .path.display())]
    Csv {
        /// Table path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Invalid configuration file or value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem setup failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable failure of a single row.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The legacy page could not be fetched
    #[error("{0}")]
    Fetch(String),

    /// The model call failed or the HTML was rejected
    #[error(transparent)]
    Extract(#[from] ExtractorError),

    /// The markdown file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Startup failure
    #[error(transparent)]
    Startup(#[from] StartupError),

    /// Site index could not be written
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Model client could not be created
    #[error("LLM error: {0}")]
    Llm(#[from] migrator_llm::LlmError),

    /// Page fetcher could not be created
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
