// Head-to-head and phase-segmented batting statistics over the ledger.

use serde::Serialize;

use super::delivery::{Delivery, DeliveryLedger};

/// Status line when a head-to-head record exists.
pub const H2H_FOUND_STATUS: &str = "H2H Data Found";
/// Status line when a pair has never met in the ledger.
pub const H2H_NOT_FOUND_STATUS: &str =
    "No historical H2H data found. Switching to Skill-Type analysis...";

// ---------------------------------------------------------------------------
// Matchup stats
// ---------------------------------------------------------------------------

/// Aggregate batting outcome over a set of deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchupStats {
    pub balls_faced: u32,
    pub runs_scored: u32,
    pub dismissals: u32,
    pub dot_balls: u32,
    pub boundaries: u32,
    /// Runs per 100 balls; 0.0 when no balls were faced.
    pub strike_rate: f64,
}

impl MatchupStats {
    /// Aggregate any set of deliveries.
    pub fn from_deliveries<'a, I>(deliveries: I) -> Self
    where
        I: IntoIterator<Item = &'a Delivery>,
    {
        let mut stats = MatchupStats {
            balls_faced: 0,
            runs_scored: 0,
            dismissals: 0,
            dot_balls: 0,
            boundaries: 0,
            strike_rate: 0.0,
        };
        for d in deliveries {
            stats.balls_faced = stats.balls_faced.saturating_add(1);
            stats.runs_scored = stats.runs_scored.saturating_add(d.runs_off_bat);
            if d.is_dismissal() {
                stats.dismissals = stats.dismissals.saturating_add(1);
            }
            if d.is_dot() {
                stats.dot_balls = stats.dot_balls.saturating_add(1);
            }
            if d.is_boundary() {
                stats.boundaries = stats.boundaries.saturating_add(1);
            }
        }
        stats.strike_rate = per_hundred(stats.runs_scored, stats.balls_faced);
        stats
    }

    /// Share of balls with no runs off the bat, as a percentage.
    pub fn dot_ball_pct(&self) -> f64 {
        per_hundred(self.dot_balls, self.balls_faced)
    }

    /// Average balls between boundaries; `None` without any boundary.
    pub fn balls_per_boundary(&self) -> Option<f64> {
        (self.boundaries > 0).then(|| self.balls_faced as f64 / self.boundaries as f64)
    }
}

/// `part * 100 / whole`, guarded against an empty denominator.
fn per_hundred(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

// ---------------------------------------------------------------------------
// Head-to-head
// ---------------------------------------------------------------------------

/// Result of a batter-versus-bowler query. No shared history is a normal
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HeadToHead {
    Found { stats: MatchupStats },
    NotFound { status: String },
}

impl HeadToHead {
    pub fn stats(&self) -> Option<&MatchupStats> {
        match self {
            HeadToHead::Found { stats } => Some(stats),
            HeadToHead::NotFound { .. } => None,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            HeadToHead::Found { .. } => H2H_FOUND_STATUS,
            HeadToHead::NotFound { status } => status,
        }
    }
}

/// All deliveries `batter` faced from `bowler` (exact, case-sensitive).
pub fn head_to_head(ledger: &DeliveryLedger, batter: &str, bowler: &str) -> HeadToHead {
    let mut h2h = ledger
        .iter()
        .filter(|d| d.striker == batter && d.bowler == bowler)
        .peekable();
    if h2h.peek().is_none() {
        return HeadToHead::NotFound {
            status: H2H_NOT_FOUND_STATUS.to_string(),
        };
    }
    HeadToHead::Found {
        stats: MatchupStats::from_deliveries(h2h),
    }
}

/// Career-in-ledger totals for `batter` against every bowler. Zeroed for a
/// batter with no deliveries.
pub fn batter_summary(ledger: &DeliveryLedger, batter: &str) -> MatchupStats {
    MatchupStats::from_deliveries(ledger.faced_by(batter))
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// T20 innings segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Overs 1-6.
    Powerplay,
    /// Overs 7-15.
    Middle,
    /// Overs 16-20.
    Death,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Powerplay, Phase::Middle, Phase::Death];

    /// Bucket a 1-based over number. Overs outside 1-20 have no phase.
    pub fn for_over(over: u32) -> Option<Self> {
        match over {
            1..=6 => Some(Phase::Powerplay),
            7..=15 => Some(Phase::Middle),
            16..=20 => Some(Phase::Death),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Powerplay => "Powerplay",
            Phase::Middle => "Middle",
            Phase::Death => "Death",
        }
    }
}

/// Runs and balls inside one phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseTotals {
    pub runs: u32,
    pub balls: u32,
}

impl PhaseTotals {
    /// Runs per 100 balls in the phase; 0.0 for an empty phase.
    pub fn strike_rate(&self) -> f64 {
        per_hundred(self.runs, self.balls)
    }
}

/// Per-phase totals for one batter. Every phase is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseStats {
    pub powerplay: PhaseTotals,
    pub middle: PhaseTotals,
    pub death: PhaseTotals,
}

impl PhaseStats {
    pub fn get(&self, phase: Phase) -> &PhaseTotals {
        match phase {
            Phase::Powerplay => &self.powerplay,
            Phase::Middle => &self.middle,
            Phase::Death => &self.death,
        }
    }

    fn get_mut(&mut self, phase: Phase) -> &mut PhaseTotals {
        match phase {
            Phase::Powerplay => &mut self.powerplay,
            Phase::Middle => &mut self.middle,
            Phase::Death => &mut self.death,
        }
    }

    pub fn runs(&self, phase: Phase) -> u32 {
        self.get(phase).runs
    }

    /// Phases in innings order with their totals.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &PhaseTotals)> {
        Phase::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    pub fn total_runs(&self) -> u32 {
        self.iter().fold(0u32, |acc, (_, t)| acc.saturating_add(t.runs))
    }
}

/// Bucket `batter`'s deliveries by phase. Deliveries without a usable over
/// number (outside 1-20) are left out.
pub fn phase_profile(ledger: &DeliveryLedger, batter: &str) -> PhaseStats {
    let mut stats = PhaseStats::default();
    for d in ledger.faced_by(batter) {
        if let Some(phase) = Phase::for_over(d.over) {
            let totals = stats.get_mut(phase);
            totals.runs = totals.runs.saturating_add(d.runs_off_bat);
            totals.balls = totals.balls.saturating_add(1);
        }
    }
    stats
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Strike rate below which the bowler is judged to be suppressing the batter.
pub const CHOKE_STRIKE_RATE: f64 = 110.0;
/// Dismissals above which the bowler is judged to have the batter's number.
pub const VULNERABILITY_DISMISSALS: u32 = 2;

/// One-line reading of a head-to-head record. Branches are exclusive and
/// checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchupVerdict {
    Choke,
    Vulnerability,
    Dominance,
}

impl MatchupVerdict {
    pub fn from_stats(stats: &MatchupStats) -> Self {
        if stats.strike_rate < CHOKE_STRIKE_RATE {
            MatchupVerdict::Choke
        } else if stats.dismissals > VULNERABILITY_DISMISSALS {
            MatchupVerdict::Vulnerability
        } else {
            MatchupVerdict::Dominance
        }
    }

    pub fn describe(&self, batter: &str, bowler: &str) -> String {
        match self {
            MatchupVerdict::Choke => {
                format!("Choke Alert: {bowler} successfully suppresses {batter}'s scoring.")
            }
            MatchupVerdict::Vulnerability => {
                format!("Vulnerability: {bowler} has {batter}'s number.")
            }
            MatchupVerdict::Dominance => {
                format!("Dominance: {batter} handles this matchup with ease.")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
