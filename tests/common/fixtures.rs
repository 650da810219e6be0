//! Test fixtures and data factories

use async_trait::async_trait;
use fixmd::config::Config;
use fixmd::core::providers::Transformer;
use fixmd::utils::error::TransformError;
use fixmd::utils::error::recovery::RetryConfig;
use fixmd::GeminiConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Temporary working directory
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` at `rel`, creating parent directories
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path().join(rel)).expect("read file")
    }

    pub fn backup_root(&self) -> PathBuf {
        self.path().join("backup")
    }

    pub fn config(&self) -> Config {
        test_config(self.path())
    }
}

/// Retry schedule in milliseconds so tests stay fast
pub fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_delay: Duration::from_millis(2),
        max_delay: Duration::from_millis(8),
        jitter_ratio: 0.2,
    }
}

/// Config rooted at `work_dir`, no progress bar
pub fn test_config(work_dir: &Path) -> Config {
    Config {
        gemini: GeminiConfig::new("test-key"),
        retry: fast_retry(3),
        max_concurrent: 3,
        extension: "md".to_string(),
        work_dir: work_dir.to_path_buf(),
        backup_dir: work_dir.join("backup"),
        show_progress: false,
    }
}

type Behavior = dyn Fn(&str, usize) -> Result<String, TransformError> + Send + Sync;

/// Transformer driven by a closure of `(content, call_index)`.
///
/// Counts calls and tracks the peak number of calls in flight.
pub struct ScriptedTransformer {
    behavior: Box<Behavior>,
    delay: Duration,
    calls: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedTransformer {
    pub fn new<F>(behavior: F) -> Self
    where
        F: Fn(&str, usize) -> Result<String, TransformError> + Send + Sync + 'static,
    {
        Self {
            behavior: Box::new(behavior),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Uppercases every input
    pub fn uppercase() -> Self {
        Self::new(|content, _| Ok(content.to_uppercase()))
    }

    /// Fails every call with a transient error
    pub fn always_failing() -> Self {
        Self::new(|_, _| Err(TransformError::status(503, "unavailable")))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transformer for ScriptedTransformer {
    async fn transform(&self, content: &str) -> Result<String, TransformError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = (self.behavior)(content, index);
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
