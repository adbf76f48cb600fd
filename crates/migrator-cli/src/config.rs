//! Configuration management for the migration run.
//!
//! Settings come from three layers: built-in defaults, an optional TOML file
//! and command-line flags, each overriding the previous one. The merged
//! [`MigrationConfig`] is validated once into a [`RunContext`] that every
//! component receives explicitly.

use crate::cli::Cli;
use crate::error::StartupError;
use migrator_extractor::ExtractorConfig;
use migrator_index::{SectionDescriptions, INDEX_FILE_NAME};
use migrator_llm::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Migration settings as read from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Sitemap CSV
    pub csv_file: PathBuf,

    /// Prompt template
    pub prompt_file: PathBuf,

    /// Directory for markdown files and the site index
    pub output_dir: PathBuf,

    /// Log file
    pub log_file: PathBuf,

    /// Gemini model name
    pub model: String,

    /// Pause between pages (seconds)
    pub delay_secs: u64,

    /// Process at most this many pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Extraction engine settings
    pub extractor: ExtractorConfig,

    /// Extra or replacement category descriptions
    pub section_descriptions: BTreeMap<String, String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            csv_file: PathBuf::from("url_sitemap.csv"),
            prompt_file: PathBuf::from("prompt.md"),
            output_dir: PathBuf::from("output"),
            log_file: PathBuf::from("migration.log"),
            model: DEFAULT_MODEL.to_string(),
            delay_secs: 2,
            limit: None,
            extractor: ExtractorConfig::default(),
            section_descriptions: BTreeMap::new(),
        }
    }
}

impl MigrationConfig {
    /// Parse a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, StartupError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| StartupError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, StartupError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            StartupError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Defaults, overlaid with the file named by `--config` (if any) and then
    /// with the remaining flags.
    pub fn resolve(cli: &Cli) -> Result<Self, StartupError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Override settings with the flags that were given.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(csv) = &cli.csv {
            self.csv_file = csv.clone();
        }
        if let Some(prompt) = &cli.prompt {
            self.prompt_file = prompt.clone();
        }
        if let Some(output) = &cli.output {
            self.output_dir = output.clone();
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = log_file.clone();
        }
        if let Some(model) = &cli.model {
            self.model = model.clone();
        }
        if let Some(delay) = cli.delay_secs {
            self.delay_secs = delay;
        }
        if let Some(limit) = cli.limit {
            self.limit = Some(limit);
        }
        if let Some(retries) = cli.max_retries {
            self.extractor.max_retries = retries;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.model.trim().is_empty() {
            return Err(StartupError::Config("model must not be empty".to_string()));
        }
        self.extractor
            .validate()
            .map_err(|e| StartupError::Config(e.to_string()))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, StartupError> {
        toml::to_string_pretty(self)
            .map_err(|e| StartupError::Config(format!("Failed to serialize config: {}", e)))
    }
}

/// Everything a migration run needs, resolved and checked once at startup.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Model API key
    pub api_key: String,
    /// Sitemap CSV
    pub csv_path: PathBuf,
    /// Prompt template text
    pub prompt_template: String,
    /// Output directory (exists once the context is built)
    pub output_dir: PathBuf,
    /// Log file
    pub log_file: PathBuf,
    /// Gemini model name
    pub model: String,
    /// Process at most this many pages
    pub limit: Option<usize>,
    /// Pause between pages
    pub row_delay: Duration,
    /// Extraction engine settings
    pub extractor: ExtractorConfig,
    /// Category descriptions for the site index
    pub section_descriptions: SectionDescriptions,
    /// Run start date (YYYY-MM-DD)
    pub extraction_date: String,
}

impl RunContext {
    /// Check the startup preconditions and build the context.
    ///
    /// Checks, in order: credential, CSV, prompt template. The prompt is read
    /// here and the output directory is created.
    pub fn new(
        config: MigrationConfig,
        api_key: Option<String>,
        extraction_date: impl Into<String>,
    ) -> Result<Self, StartupError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(StartupError::MissingCredential)?;

        if !config.csv_file.is_file() {
            return Err(StartupError::MissingCsv(config.csv_file));
        }
        if !config.prompt_file.is_file() {
            return Err(StartupError::MissingPrompt(config.prompt_file));
        }

        let prompt_template = fs::read_to_string(&config.prompt_file)?;
        fs::create_dir_all(&config.output_dir)?;

        let mut section_descriptions = SectionDescriptions::default();
        section_descriptions.extend(config.section_descriptions);

        Ok(Self {
            api_key,
            csv_path: config.csv_file,
            prompt_template,
            output_dir: config.output_dir,
            log_file: config.log_file,
            model: config.model,
            limit: config.limit,
            row_delay: Duration::from_secs(config.delay_secs),
            extractor: config.extractor,
            section_descriptions,
            extraction_date: extraction_date.into(),
        })
    }

    /// Path of the site index artifact
    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(INDEX_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> MigrationConfig {
        let csv = dir.path().join("pages.csv");
        let prompt = dir.path().join("prompt.md");
        fs::write(&csv, "Page names,Section,Old URL\n").unwrap();
        fs::write(&prompt, "Extract the page.").unwrap();

        MigrationConfig {
            csv_file: csv,
            prompt_file: prompt,
            output_dir: dir.path().join("output"),
            ..MigrationConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = MigrationConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.log_file, PathBuf::from("migration.log"));
        assert_eq!(config.delay_secs, 2);
        assert_eq!(config.extractor.max_retries, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = MigrationConfig::from_toml(
            r#"
            output_dir = "site/content"
            delay_secs = 0

            [extractor]
            max_retries = 4

            [section_descriptions]
            "Health" = "Hospitals and clinics"
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("site/content"));
        assert_eq!(config.delay_secs, 0);
        assert_eq!(config.extractor.max_retries, 4);
        assert_eq!(config.extractor.retry_delay_ms, 1_000);
        assert_eq!(config.csv_file, PathBuf::from("url_sitemap.csv"));
        assert_eq!(
            config.section_descriptions.get("Health").map(String::as_str),
            Some("Hospitals and clinics")
        );
    }

    #[test]
    fn test_from_toml_rejects_invalid_extractor() {
        let result = MigrationConfig::from_toml("[extractor]\nmax_html_length = 0\n");
        assert!(matches!(result, Err(StartupError::Config(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = MigrationConfig::default();
        let toml = config.to_toml().unwrap();
        assert_eq!(MigrationConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migrator.toml");
        fs::write(&path, "model = \"from-file\"\ndelay_secs = 9\n").unwrap();

        let cli = Cli::try_parse_from([
            "content-migrator",
            "--config",
            path.to_str().unwrap(),
            "--delay-secs",
            "1",
            "--max-retries",
            "0",
        ])
        .unwrap();
        let config = MigrationConfig::resolve(&cli).unwrap();

        assert_eq!(config.model, "from-file");
        assert_eq!(config.delay_secs, 1);
        assert_eq!(config.extractor.max_retries, 0);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/migrator.toml")),
            ..Cli::default()
        };
        assert!(matches!(
            MigrationConfig::resolve(&cli),
            Err(StartupError::Config(_))
        ));
    }

    #[test]
    fn test_run_context_requires_credential() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let result = RunContext::new(config.clone(), None, "2025-01-15");
        assert!(matches!(result, Err(StartupError::MissingCredential)));

        let result = RunContext::new(config, Some("  ".to_string()), "2025-01-15");
        assert!(matches!(result, Err(StartupError::MissingCredential)));
    }

    #[test]
    fn test_run_context_requires_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let key = Some("key".to_string());

        let mut config = config_in(&dir);
        config.csv_file = dir.path().join("missing.csv");
        assert!(matches!(
            RunContext::new(config, key.clone(), "2025-01-15"),
            Err(StartupError::MissingCsv(_))
        ));

        let mut config = config_in(&dir);
        config.prompt_file = dir.path().join("missing.md");
        assert!(matches!(
            RunContext::new(config, key, "2025-01-15"),
            Err(StartupError::MissingPrompt(_))
        ));
    }

    #[test]
    fn test_run_context_prepares_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config
            .section_descriptions
            .insert("Health".to_string(), "Hospitals".to_string());

        let ctx = RunContext::new(config, Some("key".to_string()), "2025-01-15").unwrap();

        assert!(ctx.output_dir.is_dir());
        assert_eq!(ctx.prompt_template, "Extract the page.");
        assert_eq!(ctx.row_delay, Duration::from_secs(2));
        assert_eq!(ctx.index_path(), dir.path().join("output").join("content-ia.json"));
        assert_eq!(ctx.section_descriptions.get("Health"), "Hospitals");
        assert_eq!(
            ctx.section_descriptions.get("Public safety"),
            "Reporting crime, raising a concern and safeguarding"
        );
    }
}
