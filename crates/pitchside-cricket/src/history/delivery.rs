// Delivery ledger: the unified, immutable set of ball-by-ball rows.

use serde::Serialize;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Wicket type
// ---------------------------------------------------------------------------

/// How a wicket fell on a delivery. Unrecognised source labels are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum WicketType {
    Bowled,
    Caught,
    CaughtAndBowled,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    RetiredHurt,
    RetiredOut,
    ObstructingTheField,
    HitTheBallTwice,
    HandledTheBall,
    TimedOut,
    Other(String),
}

impl WicketType {
    /// Parse a Cricsheet wicket label ("caught and bowled", "run out", ...).
    /// Returns `None` for blank input.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        let key: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let wicket = match key.as_str() {
            "bowled" => WicketType::Bowled,
            "caught" => WicketType::Caught,
            "caughtandbowled" => WicketType::CaughtAndBowled,
            "lbw" => WicketType::Lbw,
            "runout" => WicketType::RunOut,
            "stumped" => WicketType::Stumped,
            "hitwicket" => WicketType::HitWicket,
            "retiredhurt" => WicketType::RetiredHurt,
            "retiredout" => WicketType::RetiredOut,
            "obstructingthefield" => WicketType::ObstructingTheField,
            "hittheballtwice" => WicketType::HitTheBallTwice,
            "handledtheball" => WicketType::HandledTheBall,
            "timedout" => WicketType::TimedOut,
            _ => WicketType::Other(trimmed.to_string()),
        };
        Some(wicket)
    }
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// One legal or illegal ball as recorded in the source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub match_id: String,
    pub innings: u32,
    /// 1-based over number. 0 when the source gave no usable position.
    pub over: u32,
    pub ball_in_over: u32,
    pub striker: String,
    pub bowler: String,
    pub runs_off_bat: u32,
    pub extras: u32,
    pub wicket_type: Option<WicketType>,
}

impl Delivery {
    pub fn is_dismissal(&self) -> bool {
        self.wicket_type.is_some()
    }

    pub fn is_dot(&self) -> bool {
        self.runs_off_bat == 0
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self.runs_off_bat, 4 | 6)
    }
}

/// Parse Cricsheet's `O.B` ball field (0-based over, ball within the over)
/// into a 1-based over number and the ball number. "5.3" -> (6, 3).
pub fn parse_ball_position(s: &str) -> Option<(u32, u32)> {
    let (over, ball) = s.trim().split_once('.')?;
    let over: u32 = over.parse().ok()?;
    let ball: u32 = ball.parse().ok()?;
    Some((over.checked_add(1)?, ball))
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Ordered collection of deliveries, immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryLedger {
    deliveries: Vec<Delivery>,
}

impl DeliveryLedger {
    pub fn new(deliveries: Vec<Delivery>) -> Self {
        DeliveryLedger { deliveries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter()
    }

    /// Deliveries faced by `batter` (exact, case-sensitive match).
    pub fn faced_by<'a>(&'a self, batter: &'a str) -> impl Iterator<Item = &'a Delivery> + 'a {
        self.deliveries.iter().filter(move |d| d.striker == batter)
    }

    /// Sorted, de-duplicated striker names.
    pub fn strikers(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.deliveries.iter().map(|d| d.striker.as_str()).collect();
        set.into_iter().collect()
    }

    /// Sorted, de-duplicated bowler names.
    pub fn bowlers(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.deliveries.iter().map(|d| d.bowler.as_str()).collect();
        set.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
