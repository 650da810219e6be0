//! Logging setup
//!
//! Installs the global `tracing` subscriber used by the binary.

use tracing_subscriber::EnvFilter;

/// Default directives when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "fixmd=info,warn";
/// Directives used with `--verbose`
pub const VERBOSE_FILTER: &str = "fixmd=debug,warn";

/// Logging utilities
pub struct LoggingUtils;

impl LoggingUtils {
    /// Build the filter: `RUST_LOG` wins, otherwise the verbosity default
    pub fn env_filter(verbose: bool) -> EnvFilter {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        Self::filter_from(rust_log.as_deref(), verbose)
    }

    /// Filter from explicit `RUST_LOG` directives; unparseable ones fall
    /// back to the verbosity default
    pub fn filter_from(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
        rust_log
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| {
                EnvFilter::new(if verbose {
                    VERBOSE_FILTER
                } else {
                    DEFAULT_FILTER
                })
            })
    }

    /// Install the fmt subscriber writing to stderr.
    ///
    /// A second install is ignored.
    pub fn init_logger(verbose: bool) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(Self::env_filter(verbose))
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init();
    }
}
