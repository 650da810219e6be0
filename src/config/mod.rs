//! Configuration management for fixmd
//!
//! A [`Config`] is built once at startup from `.env`, the process
//! environment and the command line, validated, and then passed by
//! reference into the client and pipeline constructors.

pub mod cli;
pub mod defaults;
pub mod validation;

pub use cli::CliArgs;
pub use validation::Validate;

use crate::core::providers::gemini::GeminiConfig;
use crate::core::task::BackupLayout;
use crate::utils::error::{FixmdError, Result};
use crate::utils::error::recovery::RetryConfig;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote transform service settings
    pub gemini: GeminiConfig,
    /// Backoff schedule around each remote call
    pub retry: RetryConfig,
    /// Ceiling on concurrent remote calls
    pub max_concurrent: usize,
    /// Extension (without the dot) of files to process
    pub extension: String,
    /// Working directory backups are mirrored against
    pub work_dir: PathBuf,
    /// Root directory receiving backups
    pub backup_dir: PathBuf,
    /// Render the live progress bar
    pub show_progress: bool,
}

impl Config {
    /// Read the environment, apply CLI overrides and validate.
    ///
    /// `.env` is loaded separately by [`Config::load_dotenv`].
    pub fn load(args: &CliArgs, work_dir: PathBuf) -> Result<Self> {
        let mut config = Self::from_env(work_dir)?;
        config.apply_args(args);
        config
            .validate()
            .map_err(FixmdError::config)?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Load `.env` from the working directory into the process environment.
    ///
    /// Runs before the logger is installed so a `RUST_LOG` from `.env`
    /// applies; pass the outcome to [`Config::report_dotenv`] afterwards.
    pub fn load_dotenv() -> std::result::Result<PathBuf, dotenvy::Error> {
        dotenvy::dotenv()
    }

    /// Log the outcome of [`Config::load_dotenv`]; a missing file is not an error
    pub fn report_dotenv(loaded: &std::result::Result<PathBuf, dotenvy::Error>) {
        match loaded {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => {
                warn!(".env file not found or couldn't be loaded: {}", e);
                info!("Will check for environment variables directly or use defaults");
            }
        }
    }

    /// Build from the process environment
    pub fn from_env(work_dir: PathBuf) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), work_dir)
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Fails when the API key is absent or empty.
    pub fn from_lookup<F>(lookup: F, work_dir: PathBuf) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(defaults::GEMINI_API_KEY_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                FixmdError::config(format!(
                    "{} not found in environment variables or .env file",
                    defaults::GEMINI_API_KEY_ENV
                ))
            })?;

        let mut gemini = GeminiConfig::new(api_key);
        match lookup(defaults::GEMINI_API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            Some(url) => gemini.api_url = url,
            None => info!(
                "{} not found, using default URL",
                defaults::GEMINI_API_URL_ENV
            ),
        }

        Ok(Self {
            gemini,
            retry: RetryConfig::default(),
            max_concurrent: defaults::MAX_CONCURRENT,
            extension: defaults::FILE_EXTENSION.to_string(),
            backup_dir: work_dir.join(defaults::BACKUP_DIR_NAME),
            work_dir,
            show_progress: true,
        })
    }

    /// Apply command-line overrides
    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(concurrency) = args.concurrency {
            self.max_concurrent = concurrency;
        }
        if let Some(extension) = &args.extension {
            self.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(backup_dir) = &args.backup_dir {
            self.backup_dir = if backup_dir.is_absolute() {
                backup_dir.clone()
            } else {
                self.work_dir.join(backup_dir)
            };
        }
        if args.no_progress {
            self.show_progress = false;
        }
    }

    /// Backup path derivation rule for this run
    pub fn backup_layout(&self) -> BackupLayout {
        BackupLayout::new(self.work_dir.clone(), self.backup_dir.clone())
    }
}
