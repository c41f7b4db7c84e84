// Tactical scorer: player DNA against the pitch coefficients.
//
// Score starts at 80 and is adjusted by an ordered rule table. Every rule
// that fires contributes; the final score is clamped to 0-100.

use serde::Serialize;

use super::player::PlayerProfile;
use super::rules::{evaluate_rules, Rule};
use crate::physics::model::PitchPhysics;

pub const BASE_SCORE: i32 = 80;
pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

// ---------------------------------------------------------------------------
// Alert tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertTag {
    ChokeAlert,
    SpinTrap,
    Accelerator,
}

impl AlertTag {
    pub fn code(&self) -> &'static str {
        match self {
            AlertTag::ChokeAlert => "CHOKE_ALERT",
            AlertTag::SpinTrap => "SPIN_TRAP",
            AlertTag::Accelerator => "ACCELERATOR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AlertTag::ChokeAlert => "High failure probability under dew/pressure.",
            AlertTag::SpinTrap => "Batter likely to be suffocated by spin on this surface.",
            AlertTag::Accelerator => "Elite ability to shift gears in death overs.",
        }
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Score plus the alerts that produced it, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TacticalAssessment {
    pub score: u8,
    pub alerts: Vec<AlertTag>,
}

/// What the rules look at.
#[derive(Debug, Clone, Copy)]
struct ScoringInputs {
    pressure_resistance: u8,
    spin_skill: u8,
    acceleration_rating: u8,
    physics: PitchPhysics,
}

const SCORING_RULES: &[Rule<ScoringInputs, AlertTag>] = &[
    // Slippery ball plus a player who folds under pressure.
    Rule {
        tag: AlertTag::ChokeAlert,
        applies: chokes_under_dew,
        delta: -25,
    },
    // Gripping surface against a weak player of spin.
    Rule {
        tag: AlertTag::SpinTrap,
        applies: trapped_by_spin,
        delta: -20,
    },
    Rule {
        tag: AlertTag::Accelerator,
        applies: accelerates,
        delta: 15,
    },
];

fn chokes_under_dew(i: &ScoringInputs) -> bool {
    i.pressure_resistance < 45 && i.physics.dew_factor > 0.7
}

fn trapped_by_spin(i: &ScoringInputs) -> bool {
    i.physics.spin_index > 0.7 && i.spin_skill < 50
}

fn accelerates(i: &ScoringInputs) -> bool {
    i.acceleration_rating > 80
}

/// Score a player under the given pitch conditions.
pub fn evaluate(player: &PlayerProfile, physics: &PitchPhysics) -> TacticalAssessment {
    let inputs = ScoringInputs {
        pressure_resistance: player.pressure_resistance,
        spin_skill: player.spin_skill,
        acceleration_rating: player.acceleration_rating,
        physics: *physics,
    };
    let outcome = evaluate_rules(SCORING_RULES, &inputs, BASE_SCORE);
    TacticalAssessment {
        score: outcome.score.clamp(MIN_SCORE, MAX_SCORE) as u8,
        alerts: outcome.tags,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
