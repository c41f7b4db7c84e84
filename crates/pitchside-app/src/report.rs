// Report assembly: the serializable shapes the CLI prints, as JSON or text.

use std::fmt;

use pitchside_cricket::history::matchup::{
    batter_summary, head_to_head, phase_profile, HeadToHead, MatchupStats, MatchupVerdict,
    PhaseStats,
};
use pitchside_cricket::history::scouting::{
    scout, FlagKind, ScoutFlag, ScoutingContext, ScoutingReport,
};
use pitchside_cricket::physics::model::{compute_physics, PitchPhysics, WeatherInput};
use pitchside_cricket::physics::venue::{VenueCatalog, VenueProfile};
use pitchside_cricket::tactics::player::{PlayerProfile, PlayerRole};
use pitchside_cricket::tactics::scorer::{evaluate, AlertTag};
use serde::Serialize;

use crate::ledger_cache::LoadedLedger;

// ---------------------------------------------------------------------------
// Venues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct VenuesReport {
    pub venues: Vec<VenueProfile>,
}

impl VenuesReport {
    pub fn from_catalog(catalog: &VenueCatalog) -> Self {
        VenuesReport {
            venues: catalog.iter().cloned().collect(),
        }
    }
}

impl fmt::Display for VenuesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.venues {
            writeln!(
                f,
                "{:<22} {:<10} clay {:.2}  alt {:>4.0} m  avg {:>4.1} C  drainage {:<8} UTC{:+}m",
                v.name,
                v.soil_type.label(),
                v.clay_fraction,
                v.altitude_m,
                v.avg_temp_c,
                v.drainage.label(),
                v.utc_offset_minutes,
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PhysicsReport {
    pub venue: String,
    pub weather: WeatherInput,
    pub physics: PitchPhysics,
    pub swing_pct: u32,
    pub spin_pct: u32,
    pub dew_pct: u32,
    pub dew_risk: &'static str,
}

impl PhysicsReport {
    pub fn build(venue: &VenueProfile, weather: &WeatherInput) -> Self {
        let physics = compute_physics(venue, weather);
        PhysicsReport {
            venue: venue.name.clone(),
            weather: weather.clone(),
            physics,
            swing_pct: physics.swing_pct(),
            spin_pct: physics.spin_pct(),
            dew_pct: physics.dew_pct(),
            dew_risk: physics.dew_risk_label(),
        }
    }
}

impl fmt::Display for PhysicsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} at {}",
            self.venue,
            self.weather.timestamp.format("%Y-%m-%d %H:%M %:z")
        )?;
        writeln!(f, "  Swing:      {}%", self.swing_pct)?;
        writeln!(f, "  Spin grip:  {}%", self.spin_pct)?;
        writeln!(f, "  Dew risk:   {} ({}%)", self.dew_risk, self.dew_pct)
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AlertLine {
    pub tag: AlertTag,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub player: PlayerProfile,
    pub conditions: PhysicsReport,
    pub score: u8,
    pub alerts: Vec<AlertLine>,
}

impl AssessmentReport {
    pub fn build(player: PlayerProfile, venue: &VenueProfile, weather: &WeatherInput) -> Self {
        let conditions = PhysicsReport::build(venue, weather);
        let assessment = evaluate(&player, &conditions.physics);
        AssessmentReport {
            player,
            conditions,
            score: assessment.score,
            alerts: assessment
                .alerts
                .into_iter()
                .map(|tag| AlertLine {
                    tag,
                    description: tag.description(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for AssessmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.conditions)?;
        writeln!(
            f,
            "{} ({}): tactical score {}/100",
            self.player.name,
            self.player.role.label(),
            self.score
        )?;
        if self.alerts.is_empty() {
            writeln!(f, "  No alerts.")?;
        }
        for alert in &self.alerts {
            writeln!(f, "  [{}] {}", alert.tag.code(), alert.description)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Matchup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MatchupReport {
    pub batter: String,
    pub bowler: String,
    pub head_to_head: HeadToHead,
    pub status: String,
    pub verdict: Option<MatchupVerdict>,
    pub verdict_text: Option<String>,
    pub batter_summary: MatchupStats,
    pub phases: PhaseStats,
    pub scouting: ScoutingReport,
    /// Fired scouting flags worded for this pairing, in rule order.
    pub scouting_notes: Vec<ScoutNote>,
    /// Informational messages, e.g. a degraded ledger.
    pub notices: Vec<String>,
}

impl MatchupReport {
    pub fn build(loaded: &LoadedLedger, batter: &str, bowler: &str) -> Self {
        let ledger = &loaded.build.ledger;
        let h2h = head_to_head(ledger, batter, bowler);
        let summary = batter_summary(ledger, batter);
        let phases = phase_profile(ledger, batter);
        let scouting = scout(&ScoutingContext {
            batter: summary,
            phases,
            head_to_head: h2h.stats().copied(),
        });

        let scouting_notes = scouting
            .flags
            .iter()
            .map(|&flag| ScoutNote::new(flag, bowler, h2h.stats()))
            .collect();

        let verdict = h2h.stats().map(MatchupVerdict::from_stats);
        let verdict_text = verdict.map(|v| v.describe(batter, bowler));

        let mut notices: Vec<String> = loaded.notice().into_iter().collect();
        if !ledger.is_empty() && summary.balls_faced == 0 {
            notices.push(format!("No deliveries recorded for {batter}."));
        }

        MatchupReport {
            batter: batter.to_string(),
            bowler: bowler.to_string(),
            status: h2h.status().to_string(),
            head_to_head: h2h,
            verdict,
            verdict_text,
            batter_summary: summary,
            phases,
            scouting,
            scouting_notes,
            notices,
        }
    }
}

impl fmt::Display for MatchupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notice in &self.notices {
            writeln!(f, "note: {notice}")?;
        }
        writeln!(f, "{} vs {}: {}", self.batter, self.bowler, self.status)?;

        if let Some(stats) = self.head_to_head.stats() {
            writeln!(
                f,
                "  Balls {}  Runs {}  Outs {}  SR {:.2}  Dots {:.1}%  Boundaries {}",
                stats.balls_faced,
                stats.runs_scored,
                stats.dismissals,
                stats.strike_rate,
                stats.dot_ball_pct(),
                stats.boundaries
            )?;
        }
        if let Some(text) = &self.verdict_text {
            writeln!(f, "  {text}")?;
        }

        writeln!(f, "Phase runs for {}:", self.batter)?;
        for (phase, totals) in self.phases.iter() {
            writeln!(
                f,
                "  {:<10} {:>4} runs off {:>3} balls",
                phase.label(),
                totals.runs,
                totals.balls
            )?;
        }

        writeln!(f, "Scouting:")?;
        if self.scouting.flags.is_empty() {
            writeln!(f, "  Nothing notable.")?;
        }
        for (kind, sign) in [(FlagKind::Strength, '+'), (FlagKind::Weakness, '-')] {
            for note in self.scouting_notes.iter().filter(|n| n.kind == kind) {
                writeln!(f, "  {sign} {}", note.text)?;
            }
        }
        match self.scouting.balls_per_boundary {
            Some(bpb) => writeln!(f, "  Boundary every {bpb:.1} balls"),
            None => writeln!(f, "  No boundaries recorded"),
        }
    }
}

/// A scouting flag with its text filled in for the bowler faced.
#[derive(Debug, Clone, Serialize)]
pub struct ScoutNote {
    pub flag: ScoutFlag,
    pub kind: FlagKind,
    pub text: String,
}

impl ScoutNote {
    fn new(flag: ScoutFlag, bowler: &str, h2h: Option<&MatchupStats>) -> Self {
        let text = match (flag, h2h) {
            (ScoutFlag::TacticalVulnerability, Some(stats)) => {
                let times = if stats.dismissals == 1 { "time" } else { "times" };
                format!(
                    "Tactical vulnerability: has been dismissed by {bowler} {} {times}.",
                    stats.dismissals
                )
            }
            _ => flag.description().to_string(),
        };
        ScoutNote {
            flag,
            kind: flag.kind(),
            text,
        }
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PlayersReport {
    pub roles: Vec<&'static str>,
    pub strikers: Vec<String>,
    pub bowlers: Vec<String>,
    pub notices: Vec<String>,
}

impl PlayersReport {
    pub fn build(loaded: &LoadedLedger) -> Self {
        let ledger = &loaded.build.ledger;
        PlayersReport {
            roles: PlayerRole::ALL.iter().map(|r| r.label()).collect(),
            strikers: ledger.strikers().into_iter().map(String::from).collect(),
            bowlers: ledger.bowlers().into_iter().map(String::from).collect(),
            notices: loaded.notice().into_iter().collect(),
        }
    }
}

impl fmt::Display for PlayersReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notice in &self.notices {
            writeln!(f, "note: {notice}")?;
        }
        writeln!(f, "Roles: {}", self.roles.join(", "))?;
        writeln!(f, "Batters ({}):", self.strikers.len())?;
        for name in &self.strikers {
            writeln!(f, "  {name}")?;
        }
        writeln!(f, "Bowlers ({}):", self.bowlers.len())?;
        for name in &self.bowlers {
            writeln!(f, "  {name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger_cache::LoadStatus;
    use pitchside_cricket::history::normalize::{normalize, SourceFile};

    fn loaded(csv: &str) -> LoadedLedger {
        LoadedLedger {
            build: normalize(vec![SourceFile::from_bytes("1.csv", csv)], 10),
            status: LoadStatus::Loaded,
        }
    }

    const KOHLI_STARC: &str = "striker,bowler,ball,runs_off_bat,wicket_type
Kohli,Starc,0.1,4,
Kohli,Starc,0.2,0,
Kohli,Starc,0.3,6,
Kohli,Starc,0.4,0,bowled";

    #[test]
    fn head_to_head_line_shows_dots_and_boundaries() {
        let report = MatchupReport::build(&loaded(KOHLI_STARC), "Kohli", "Starc");
        let text = report.to_string();
        assert!(
            text.contains("Balls 4  Runs 10  Outs 1  SR 250.00  Dots 50.0%  Boundaries 2"),
            "{text}"
        );
    }

    #[test]
    fn vulnerability_names_bowler_and_count() {
        let report = MatchupReport::build(&loaded(KOHLI_STARC), "Kohli", "Starc");
        let note = report
            .scouting_notes
            .iter()
            .find(|n| n.flag == ScoutFlag::TacticalVulnerability)
            .expect("dismissal should flag a vulnerability");
        assert_eq!(note.kind, FlagKind::Weakness);
        assert_eq!(
            note.text,
            "Tactical vulnerability: has been dismissed by Starc 1 time."
        );
        assert!(report.to_string().contains("  - Tactical vulnerability: has been dismissed by Starc 1 time."));
    }

    #[test]
    fn other_flags_keep_stock_text() {
        let note = ScoutNote::new(ScoutFlag::StrugglesWithRotation, "Starc", None);
        assert_eq!(note.text, ScoutFlag::StrugglesWithRotation.description());
        assert_eq!(note.kind, FlagKind::Weakness);
    }
}
