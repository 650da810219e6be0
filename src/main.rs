//! fixmd - back up, then reformat Markdown files through Gemini

use anyhow::{Context, Result};
use clap::Parser;
use fixmd::core::progress::print_summary;
use fixmd::utils::LoggingUtils;
use fixmd::{CliArgs, Config, Pipeline};
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    let dotenv = Config::load_dotenv();
    LoggingUtils::init_logger(args.verbose);
    Config::report_dotenv(&dotenv);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let work_dir = std::env::current_dir().context("Error getting current directory")?;
    let config = Config::load(&args, work_dir).context("Invalid configuration")?;
    let pipeline = Pipeline::new(config).context("Failed to initialize Gemini client")?;

    let summary = pipeline
        .run(&args.path, args.recursive)
        .await
        .context("Batch aborted")?;

    if summary.is_empty() {
        info!("Nothing to do");
        return Ok(());
    }

    print_summary(&summary.progress);
    for (path, reason) in &summary.failures {
        warn!(path = %path.display(), "Left unchanged: {}", reason);
    }
    // Per-file failures do not change the exit code
    Ok(())
}
