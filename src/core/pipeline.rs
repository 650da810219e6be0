//! Two-phase batch pipeline
//!
//! discover -> back up everything -> transform and write back with bounded
//! concurrency -> summarize. No original is rewritten unless every backup
//! of the batch was written first.

use super::backup::{BackupManager, BackupRecord};
use super::discovery::Discovery;
use super::progress::{LogSink, ProgressAggregator, ProgressSnapshot, TerminalSink};
use super::providers::{GeminiClient, RetryingTransformer, Transformer};
use super::scheduler::{BatchScheduler, TaskOutcome};
use super::task::FileTask;
use crate::config::Config;
use crate::utils::error::{FixmdError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Result of a whole run
#[derive(Debug)]
pub struct BatchSummary {
    /// Files written to the backup root
    pub backed_up: usize,
    /// Where each original was backed up
    pub backups: Vec<BackupRecord>,
    /// Final progress counters
    pub progress: ProgressSnapshot,
    /// Files whose transform or write-back failed, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    fn empty() -> Self {
        Self {
            backed_up: 0,
            backups: Vec::new(),
            progress: ProgressSnapshot {
                total: 0,
                processed: 0,
                success: 0,
                failed: 0,
                elapsed: Default::default(),
            },
            failures: Vec::new(),
        }
    }

    /// True when nothing matched
    pub fn is_empty(&self) -> bool {
        self.progress.total == 0
    }
}

/// Wires discovery, backup, scheduling and progress together
pub struct Pipeline {
    config: Config,
    transformer: Arc<dyn Transformer>,
}

impl Pipeline {
    /// Pipeline backed by the Gemini client with retries
    pub fn new(config: Config) -> Result<Self> {
        let client = GeminiClient::new(config.gemini.clone())?;
        let transformer = RetryingTransformer::new(client, config.retry.clone());
        Ok(Self::with_transformer(config, Arc::new(transformer)))
    }

    /// Pipeline backed by any transformer
    pub fn with_transformer(config: Config, transformer: Arc<dyn Transformer>) -> Self {
        Self {
            config,
            transformer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole batch for `target`.
    ///
    /// Setup and backup failures are returned as errors before any file is
    /// rewritten. Per-file failures are counted in the summary instead.
    pub async fn run(&self, target: &Path, recursive: bool) -> Result<BatchSummary> {
        let discovery = Discovery::new(self.config.extension.clone(), recursive);
        let root = target.to_path_buf();
        let discovered = tokio::task::spawn_blocking(move || discovery.discover(&root))
            .await
            .map_err(|e| FixmdError::internal(format!("Discovery task failed: {}", e)))??;

        if discovered.is_empty() {
            info!("No .{} files found to process", self.config.extension);
            return Ok(BatchSummary::empty());
        }

        let layout = self.config.backup_layout();
        let tasks: Vec<FileTask> = discovered
            .into_iter()
            .map(|file| FileTask::from_discovered(file, &layout))
            .collect();

        info!(
            "=== Creating Backups === ({} files into {})",
            tasks.len(),
            layout.backup_root().display()
        );
        let backups = BackupManager::new().backup_all(&tasks).await?;

        info!(
            "=== Processing Files === ({} files, {} concurrent)",
            tasks.len(),
            self.config.max_concurrent
        );
        let aggregator = if self.config.show_progress {
            ProgressAggregator::start(tasks.len(), TerminalSink::new(tasks.len()))
        } else {
            ProgressAggregator::start(tasks.len(), LogSink)
        };
        let scheduler = BatchScheduler::new(self.transformer.clone(), self.config.max_concurrent);
        let outcomes = scheduler.run(tasks, aggregator.reporter()).await;
        let progress = aggregator.finish().await?;

        Ok(BatchSummary {
            backed_up: backups.len(),
            backups,
            progress,
            failures: collect_failures(outcomes),
        })
    }
}

fn collect_failures(outcomes: Vec<TaskOutcome>) -> Vec<(PathBuf, String)> {
    let mut failures: Vec<(PathBuf, String)> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome.result {
            Ok(()) => None,
            Err(e) => Some((outcome.path, e.to_string())),
        })
        .collect();
    failures.sort_by(|a, b| a.0.cmp(&b.0));
    failures
}
