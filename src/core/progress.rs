//! Progress aggregation
//!
//! Workers never touch shared counters. Each one holds a cloned
//! [`ProgressReporter`] and sends an event per finished file; a single
//! aggregator task owns the counters, applies events in arrival order and
//! renders after each one.

use crate::utils::error::{FixmdError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Outcome of one file, as seen by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Succeeded,
    Failed,
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub processed: usize,
    pub success: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Completed share in percent; an empty batch counts as complete
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}

/// Receives every state change of the aggregator
pub trait ProgressSink: Send {
    /// Called after each applied event
    fn render(&mut self, snapshot: &ProgressSnapshot);

    /// Called once, after the last event
    fn finish(&mut self, snapshot: &ProgressSnapshot);
}

/// Counters owned by the aggregator task.
///
/// `processed == success + failed` and `processed <= total` hold after
/// every `apply`.
#[derive(Debug)]
struct ProgressCounters {
    total: usize,
    processed: usize,
    success: usize,
    failed: usize,
    started: Instant,
}

impl ProgressCounters {
    fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            success: 0,
            failed: 0,
            started: Instant::now(),
        }
    }

    /// Returns false when the event would exceed the total
    fn apply(&mut self, event: ProgressEvent) -> bool {
        if self.processed >= self.total {
            return false;
        }
        self.processed += 1;
        match event {
            ProgressEvent::Succeeded => self.success += 1,
            ProgressEvent::Failed => self.failed += 1,
        }
        true
    }

    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total: self.total,
            processed: self.processed,
            success: self.success,
            failed: self.failed,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Cloneable handle workers use to report outcomes
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressReporter {
    pub fn record_success(&self) {
        self.send(ProgressEvent::Succeeded);
    }

    pub fn record_failure(&self) {
        self.send(ProgressEvent::Failed);
    }

    fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            warn!(?event, "Progress aggregator already stopped");
        }
    }
}

/// Owns the aggregation loop
#[derive(Debug)]
pub struct ProgressAggregator {
    reporter: ProgressReporter,
    handle: JoinHandle<ProgressSnapshot>,
}

impl ProgressAggregator {
    /// Spawn the aggregation loop for `total` tasks
    pub fn start<S>(total: usize, sink: S) -> Self
    where
        S: ProgressSink + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(aggregate(ProgressCounters::new(total), rx, sink));
        Self {
            reporter: ProgressReporter { tx },
            handle,
        }
    }

    pub fn reporter(&self) -> ProgressReporter {
        self.reporter.clone()
    }

    /// Close the channel, drain pending events and render the final state.
    ///
    /// Resolves once every reporter clone has been dropped.
    pub async fn finish(self) -> Result<ProgressSnapshot> {
        drop(self.reporter);
        self.handle
            .await
            .map_err(|e| FixmdError::internal(format!("Progress aggregator failed: {}", e)))
    }
}

async fn aggregate<S: ProgressSink>(
    mut counters: ProgressCounters,
    mut rx: mpsc::UnboundedReceiver<ProgressEvent>,
    mut sink: S,
) -> ProgressSnapshot {
    while let Some(event) = rx.recv().await {
        if !counters.apply(event) {
            warn!(?event, total = counters.total, "Ignoring event past the task total");
            continue;
        }
        sink.render(&counters.snapshot());
    }

    let snapshot = counters.snapshot();
    if !snapshot.is_complete() {
        warn!(
            processed = snapshot.processed,
            total = snapshot.total,
            "Aggregator closed before every task reported"
        );
    }
    sink.finish(&snapshot);
    snapshot
}

/// Live progress bar on the terminal
pub struct TerminalSink {
    bar: ProgressBar,
}

impl TerminalSink {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("[{bar:20}] Processing: {pos}/{len} ({percent}%) | {msg} | Elapsed: {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("= ");
        bar.set_style(style);
        bar.set_message("Success: 0 | Failed: 0");
        Self { bar }
    }
}

impl ProgressSink for TerminalSink {
    fn render(&mut self, snapshot: &ProgressSnapshot) {
        self.bar.set_position(snapshot.processed as u64);
        self.bar.set_message(format!(
            "Success: {} | Failed: {}",
            snapshot.success, snapshot.failed
        ));
    }

    fn finish(&mut self, snapshot: &ProgressSnapshot) {
        self.bar.finish_with_message(format!(
            "Success: {} | Failed: {}",
            snapshot.success, snapshot.failed
        ));
    }
}

/// Reports progress through `tracing` only
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn render(&mut self, snapshot: &ProgressSnapshot) {
        debug!(
            processed = snapshot.processed,
            total = snapshot.total,
            success = snapshot.success,
            failed = snapshot.failed,
            "Progress {:.1}%",
            snapshot.percentage()
        );
    }

    fn finish(&mut self, snapshot: &ProgressSnapshot) {
        debug!(
            elapsed_ms = snapshot.elapsed.as_millis() as u64,
            "Progress complete"
        );
    }
}

/// Print the end-of-run summary
pub fn print_summary(snapshot: &ProgressSnapshot) {
    println!();
    println!(
        "Completed: {}/{} ({:.0}%) | Success: {} | Failed: {} | Elapsed: {:.1}s",
        snapshot.processed,
        snapshot.total,
        snapshot.percentage(),
        snapshot.success,
        snapshot.failed,
        snapshot.elapsed.as_secs_f64()
    );
    println!("Processing complete!");
}
