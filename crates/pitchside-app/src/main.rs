// Pitchside entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file, not terminal)
// 4. Build the venue catalog and the lazy ledger cache
// 5. Run the command and print its report
// 6. Shut the runtime down without waiting on an abandoned ledger build

use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use pitchside_app::app::{self, AppContext, SHUTDOWN_GRACE};
use pitchside_app::cli::Cli;
use pitchside_core::{config, logging};
use tracing::{info, warn};

/// Exit status for rejected requests (bad venue, out-of-range input).
const EXIT_BAD_REQUEST: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    app::run_bounded(SHUTDOWN_GRACE, run(cli)).context("failed to start async runtime")?
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = config::load_config(&cli.config_dir).context("failed to load configuration")?;

    let log_path = logging::init_tracing(&cli.config_dir, &config.logging.filter)
        .context("failed to initialize logging")?;
    info!("Pitchside starting up, logging to {}", log_path.display());
    info!(
        "Config loaded: source_dir={}, max_files={}, {} configured venues",
        config.data.source_dir.display(),
        config.data.max_files,
        config.venues.len()
    );

    let ctx = AppContext::from_config(&config).context("invalid venue configuration")?;

    match app::execute(&ctx, &cli.command, Utc::now()).await {
        Ok(output) => {
            if cli.json {
                let json = serde_json::to_string_pretty(&output)
                    .context("failed to serialize report")?;
                println!("{json}");
            } else {
                print!("{output}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            warn!("request rejected: {}", e);
            eprintln!("error: {e}");
            Ok(ExitCode::from(EXIT_BAD_REQUEST))
        }
    }
}
