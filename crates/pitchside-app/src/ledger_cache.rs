// Process-wide delivery ledger: built once on first use, shared read-only.
//
// The build runs on the blocking pool under a timeout. Any failure (missing
// directory, panic, timeout) degrades to an empty ledger; the process keeps
// serving physics and scoring requests either way.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pitchside_core::config::DataConfig;
use pitchside_cricket::history::normalize::{normalize, read_source_dir, LedgerBuild};
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

type Loader = Arc<dyn Fn() -> std::io::Result<LedgerBuild> + Send + Sync>;

/// How the cached ledger came to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum LoadStatus {
    Loaded,
    SourceUnavailable(String),
    TimedOut,
    Failed(String),
}

/// The ledger plus the status of its one-time build.
#[derive(Debug)]
pub struct LoadedLedger {
    pub build: LedgerBuild,
    pub status: LoadStatus,
}

impl LoadedLedger {
    /// User-facing note when the ledger is degraded or empty.
    pub fn notice(&self) -> Option<String> {
        match &self.status {
            LoadStatus::Loaded if self.build.ledger.is_empty() => Some(
                "No ball-by-ball records were accepted; matchup insights are unavailable."
                    .to_string(),
            ),
            LoadStatus::Loaded => None,
            LoadStatus::SourceUnavailable(reason) => {
                Some(format!("Match data is unavailable ({reason})."))
            }
            LoadStatus::TimedOut => {
                Some("Match data took too long to load; continuing without it.".to_string())
            }
            LoadStatus::Failed(reason) => Some(format!("Match data failed to load ({reason}).")),
        }
    }
}

/// Build the ledger from a directory of source files.
pub fn build_from_dir(dir: &Path, max_files: usize) -> std::io::Result<LedgerBuild> {
    let sources = read_source_dir(dir, max_files)?;
    Ok(normalize(sources, max_files))
}

/// Construct-once, read-many holder for the ledger.
pub struct LedgerCache {
    loader: Loader,
    timeout: Duration,
    cell: OnceCell<Arc<LoadedLedger>>,
}

impl LedgerCache {
    /// Cache over the configured source directory.
    pub fn new(data: &DataConfig) -> Self {
        let dir: PathBuf = data.source_dir.clone();
        let max_files = data.max_files;
        Self::with_loader(
            Duration::from_secs(data.load_timeout_secs),
            move || build_from_dir(&dir, max_files),
        )
    }

    /// Cache over an arbitrary blocking loader.
    pub fn with_loader<F>(timeout: Duration, loader: F) -> Self
    where
        F: Fn() -> std::io::Result<LedgerBuild> + Send + Sync + 'static,
    {
        LedgerCache {
            loader: Arc::new(loader),
            timeout,
            cell: OnceCell::new(),
        }
    }

    /// The shared ledger, building it on the first call.
    pub async fn get(&self) -> Arc<LoadedLedger> {
        self.cell.get_or_init(|| self.load()).await.clone()
    }

    async fn load(&self) -> Arc<LoadedLedger> {
        let loader = Arc::clone(&self.loader);
        let task = tokio::task::spawn_blocking(move || loader());

        let (build, status) = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(build))) => (build, LoadStatus::Loaded),
            Ok(Ok(Err(e))) => {
                warn!("ledger source unavailable: {}", e);
                (LedgerBuild::default(), LoadStatus::SourceUnavailable(e.to_string()))
            }
            Ok(Err(e)) => {
                warn!("ledger build task failed: {}", e);
                (LedgerBuild::default(), LoadStatus::Failed(e.to_string()))
            }
            Err(_) => {
                warn!("ledger build exceeded {:?}, using empty ledger", self.timeout);
                (LedgerBuild::default(), LoadStatus::TimedOut)
            }
        };

        info!(
            "ledger ready: {} deliveries, status {:?}",
            build.ledger.len(),
            status
        );
        Arc::new(LoadedLedger { build, status })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
