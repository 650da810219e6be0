//! Core batch-processing functionality
//!
//! Data model, backup gate, bounded scheduler, retrying transform client
//! and progress aggregation.

pub mod backup;
pub mod discovery;
pub mod pipeline;
pub mod progress;
pub mod providers;
pub mod scheduler;
pub mod task;

pub use backup::{BackupManager, BackupRecord};
pub use discovery::Discovery;
pub use pipeline::{BatchSummary, Pipeline};
pub use progress::{
    LogSink, ProgressAggregator, ProgressEvent, ProgressReporter, ProgressSink, ProgressSnapshot,
    TerminalSink,
};
pub use scheduler::{BatchScheduler, TaskOutcome};
pub use task::{BackupLayout, DiscoveredFile, FileTask};
