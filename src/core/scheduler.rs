//! Bounded worker scheduler
//!
//! One task per file, with a bulkhead keeping at most `max_concurrent`
//! transform calls in flight. Tasks fail independently: a failure is
//! recorded and never cancels its siblings, and the scheduler waits for
//! every task before returning.

use super::progress::ProgressReporter;
use super::providers::Transformer;
use super::task::FileTask;
use crate::utils::error::recovery::Bulkhead;
use crate::utils::error::{FixmdError, Result, TransformError};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Terminal state of one file
#[derive(Debug)]
pub struct TaskOutcome {
    pub path: PathBuf,
    pub result: Result<()>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs transform-and-write tasks under a concurrency ceiling
#[derive(Clone)]
pub struct BatchScheduler {
    transformer: Arc<dyn Transformer>,
    bulkhead: Bulkhead,
}

impl BatchScheduler {
    pub fn new(transformer: Arc<dyn Transformer>, max_concurrent: usize) -> Self {
        Self {
            transformer,
            bulkhead: Bulkhead::new("transform", max_concurrent.max(1)),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.bulkhead.max_concurrent()
    }

    /// Process every task and wait for all of them.
    ///
    /// Outcomes come back in completion order. Each task reports to
    /// `reporter` exactly once.
    pub async fn run(&self, tasks: Vec<FileTask>, reporter: ProgressReporter) -> Vec<TaskOutcome> {
        let mut workers = JoinSet::new();
        for task in tasks {
            let transformer = self.transformer.clone();
            let bulkhead = self.bulkhead.clone();
            let reporter = reporter.clone();
            workers.spawn(async move {
                let path = task.path().to_path_buf();
                let result = AssertUnwindSafe(process(transformer.as_ref(), &bulkhead, &task))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| Err(FixmdError::internal("worker panicked")));
                report(&reporter, &path, &result);
                TaskOutcome { path, result }
            });
        }
        drop(reporter);

        let mut outcomes = Vec::with_capacity(workers.len());
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                // Panics are caught inside the task, so only cancellation lands here
                Err(e) => error!("Worker did not complete: {}", e),
            }
        }
        outcomes
    }
}

fn report(reporter: &ProgressReporter, path: &Path, result: &Result<()>) {
    match result {
        Ok(()) => {
            debug!(path = %path.display(), "File processed");
            reporter.record_success();
        }
        Err(e) => {
            error!(path = %path.display(), "Error processing file: {}", e);
            reporter.record_failure();
        }
    }
}

/// Transform under the bulkhead, then replace the original.
///
/// The original is only written after a successful transform.
async fn process(transformer: &dyn Transformer, bulkhead: &Bulkhead, task: &FileTask) -> Result<()> {
    let text = std::str::from_utf8(task.content())
        .map_err(|e| TransformError::InvalidInput(format!("content is not UTF-8: {}", e)))?;

    let transformed = bulkhead.call(transformer.transform(text)).await??;

    write_atomically(task.path(), transformed.as_bytes())
        .await
        .map_err(|source| FixmdError::WriteBack {
            path: task.path().to_path_buf(),
            source,
        })
}

/// Write to a sibling temp file, then rename it over `path`.
///
/// A symlink is resolved first: the link stays in place and the file it
/// points to receives the new content.
pub(crate) async fn write_atomically(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let resolved = tokio::fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf());
    let path = resolved.as_path();
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".fixmd.tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let written = async {
        tokio::fs::write(&tmp_path, content).await?;
        if let Ok(metadata) = tokio::fs::metadata(path).await {
            tokio::fs::set_permissions(&tmp_path, metadata.permissions()).await?;
        }
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;

    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }
    written
}
