// Command dispatch: validated requests in, reports out.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pitchside_core::config::Config;
use pitchside_cricket::physics::venue::{VenueCatalog, VenueError};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::Command;
use crate::ledger_cache::LedgerCache;
use crate::report::{AssessmentReport, MatchupReport, PhysicsReport, PlayersReport, VenuesReport};
use crate::request::{resolve_conditions, resolve_player, RequestError};

/// How long exit waits for blocking work still running, such as a ledger
/// build that already timed out.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Drive `fut` on a fresh multi-threaded runtime, then shut the runtime down
/// without waiting more than `grace` for leftover blocking tasks.
pub fn run_bounded<F: Future>(grace: Duration, fut: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(fut);
    runtime.shutdown_timeout(grace);
    Ok(output)
}

/// Long-lived state shared by every command.
pub struct AppContext {
    pub catalog: VenueCatalog,
    pub ledger: LedgerCache,
}

impl AppContext {
    pub fn from_config(config: &Config) -> Result<Self, VenueError> {
        let catalog = VenueCatalog::with_overrides(&config.venues)?;
        info!("venue catalog ready: {} venues", catalog.len());
        Ok(AppContext {
            catalog,
            ledger: LedgerCache::new(&config.data),
        })
    }
}

/// One command's result.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    Venues(VenuesReport),
    Physics(PhysicsReport),
    Assessment(AssessmentReport),
    Matchup(MatchupReport),
    Players(PlayersReport),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Venues(r) => fmt::Display::fmt(r, f),
            Output::Physics(r) => fmt::Display::fmt(r, f),
            Output::Assessment(r) => fmt::Display::fmt(r, f),
            Output::Matchup(r) => fmt::Display::fmt(r, f),
            Output::Players(r) => fmt::Display::fmt(r, f),
        }
    }
}

/// Run one command. Only the ledger-backed commands touch the cache, so
/// physics and scoring never wait on match data.
pub async fn execute(
    ctx: &AppContext,
    command: &Command,
    now: DateTime<Utc>,
) -> Result<Output, RequestError> {
    debug!("executing {:?}", command);
    match command {
        Command::Venues => Ok(Output::Venues(VenuesReport::from_catalog(&ctx.catalog))),
        Command::Physics(args) => {
            let (venue, weather) = resolve_conditions(&ctx.catalog, &args.to_request(), now)?;
            Ok(Output::Physics(PhysicsReport::build(venue, &weather)))
        }
        Command::Assess { conditions, player } => {
            let (venue, weather) =
                resolve_conditions(&ctx.catalog, &conditions.to_request(), now)?;
            let player = resolve_player(&player.to_request())?;
            Ok(Output::Assessment(AssessmentReport::build(player, venue, &weather)))
        }
        Command::Matchup(args) => {
            let loaded = ctx.ledger.get().await;
            Ok(Output::Matchup(MatchupReport::build(
                &loaded,
                &args.batter,
                &args.bowler,
            )))
        }
        Command::Players => {
            let loaded = ctx.ledger.get().await;
            Ok(Output::Players(PlayersReport::build(&loaded)))
        }
    }
}
