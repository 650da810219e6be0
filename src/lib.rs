//! # fixmd
//!
//! Batch Markdown formatting through the Gemini API, safely.
//!
//! A run has two phases. First every matching file is copied verbatim to a
//! mirrored backup directory; if any backup fails, nothing is rewritten.
//! Then each file is sent to the remote transform service, at most
//! `max_concurrent` at a time, with exponential backoff and jitter around
//! each call, and the result replaces the original in place.
//!
//! ```rust,no_run
//! use fixmd::{CliArgs, Config, Pipeline};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let args = CliArgs::parse();
//!     let _ = Config::load_dotenv();
//!     let config = Config::load(&args, std::env::current_dir()?)?;
//!     let summary = Pipeline::new(config)?.run(&args.path, args.recursive).await?;
//!     println!("{} succeeded, {} failed", summary.progress.success, summary.progress.failed);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod utils;

pub use config::{CliArgs, Config};
pub use core::pipeline::{BatchSummary, Pipeline};
pub use core::providers::{GeminiClient, GeminiConfig, RetryingTransformer, Transformer};
pub use utils::error::{FixmdError, Result, TransformError};
