// Scouting heuristics: strength and weakness flags from a batter's history.
//
// Same ordered-table shape as the tactical scorer, but flag-only: rules carry
// no score delta.

use serde::Serialize;

use super::matchup::{MatchupStats, PhaseStats};
use crate::tactics::rules::{evaluate_rules, Rule};

/// Death-over strike rate above which a batter is an elite finisher.
pub const ELITE_DEATH_STRIKE_RATE: f64 = 180.0;
/// Dot-ball percentage above which a batter struggles to rotate strike.
pub const ROTATION_DOT_PCT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlagKind {
    Strength,
    Weakness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoutFlag {
    EliteDeathAccelerator,
    StrugglesWithRotation,
    TacticalVulnerability,
}

impl ScoutFlag {
    pub fn kind(&self) -> FlagKind {
        match self {
            ScoutFlag::EliteDeathAccelerator => FlagKind::Strength,
            ScoutFlag::StrugglesWithRotation | ScoutFlag::TacticalVulnerability => {
                FlagKind::Weakness
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScoutFlag::EliteDeathAccelerator => {
                "Elite Death Over Accelerator: high impact in final 5 overs."
            }
            ScoutFlag::StrugglesWithRotation => "High dot-ball rate: struggles with strike rotation.",
            ScoutFlag::TacticalVulnerability => {
                "Tactical vulnerability: has been dismissed by this bowler."
            }
        }
    }
}

/// Everything the scouting rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoutingContext {
    /// The batter's totals against all bowlers.
    pub batter: MatchupStats,
    pub phases: PhaseStats,
    /// Totals against the selected bowler, when they have met.
    pub head_to_head: Option<MatchupStats>,
}

const SCOUTING_RULES: &[Rule<ScoutingContext, ScoutFlag>] = &[
    Rule {
        tag: ScoutFlag::EliteDeathAccelerator,
        applies: elite_at_death,
        delta: 0,
    },
    Rule {
        tag: ScoutFlag::StrugglesWithRotation,
        applies: struggles_to_rotate,
        delta: 0,
    },
    Rule {
        tag: ScoutFlag::TacticalVulnerability,
        applies: dismissed_by_bowler,
        delta: 0,
    },
];

fn elite_at_death(ctx: &ScoutingContext) -> bool {
    ctx.phases.death.strike_rate() > ELITE_DEATH_STRIKE_RATE
}

fn struggles_to_rotate(ctx: &ScoutingContext) -> bool {
    ctx.batter.dot_ball_pct() > ROTATION_DOT_PCT
}

fn dismissed_by_bowler(ctx: &ScoutingContext) -> bool {
    ctx.head_to_head.is_some_and(|h| h.dismissals > 0)
}

/// Flags plus the figures behind them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoutingReport {
    /// Fired flags, in rule order.
    pub flags: Vec<ScoutFlag>,
    pub death_strike_rate: f64,
    pub dot_ball_pct: f64,
    pub balls_per_boundary: Option<f64>,
}

impl ScoutingReport {
    pub fn strengths(&self) -> impl Iterator<Item = ScoutFlag> + '_ {
        self.flags
            .iter()
            .copied()
            .filter(|f| f.kind() == FlagKind::Strength)
    }

    pub fn weaknesses(&self) -> impl Iterator<Item = ScoutFlag> + '_ {
        self.flags
            .iter()
            .copied()
            .filter(|f| f.kind() == FlagKind::Weakness)
    }
}

/// Run the scouting table.
pub fn scout(ctx: &ScoutingContext) -> ScoutingReport {
    let outcome = evaluate_rules(SCOUTING_RULES, ctx, 0);
    ScoutingReport {
        flags: outcome.tags,
        death_strike_rate: ctx.phases.death.strike_rate(),
        dot_ball_pct: ctx.batter.dot_ball_pct(),
        balls_per_boundary: ctx.batter.balls_per_boundary(),
    }
}
