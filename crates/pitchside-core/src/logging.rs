// Tracing setup. Logs go to a file so that CLI output stays clean.

use anyhow::Context;
use std::path::{Path, PathBuf};

/// File name written inside the log directory.
pub const LOG_FILE: &str = "pitchside.log";

/// Pick the log directory: `<base_dir>/logs` when it can be created, else the
/// platform-local data directory for the application.
pub fn log_dir(base_dir: &Path) -> anyhow::Result<PathBuf> {
    let local = base_dir.join("logs");
    if std::fs::create_dir_all(&local).is_ok() {
        return Ok(local);
    }

    let dirs = directories::ProjectDirs::from("", "", "pitchside")
        .context("no home directory available for log fallback")?;
    let fallback = dirs.data_local_dir().join("logs");
    std::fs::create_dir_all(&fallback)
        .with_context(|| format!("failed to create log directory {}", fallback.display()))?;
    Ok(fallback)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Returns the path of the log file.
pub fn init_tracing(base_dir: &Path, default_filter: &str) -> anyhow::Result<PathBuf> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let dir = log_dir(base_dir)?;
    let path = dir.join(LOG_FILE);
    let log_file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(path)
}
