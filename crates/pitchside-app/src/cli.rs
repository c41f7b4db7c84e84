// Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::request::{ConditionsRequest, PlayerRequest};

#[derive(Parser, Debug)]
#[command(
    name = "pitchside",
    version,
    about = "Pitch physics, tactical scoring and batter-vs-bowler insights for T20 cricket"
)]
pub struct Cli {
    /// Directory holding config/, defaults/ and logs/
    #[arg(long, global = true, env = "PITCHSIDE_HOME", default_value = ".")]
    pub config_dir: PathBuf,

    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the venue catalog
    Venues,

    /// Swing, spin and dew coefficients for a venue under given weather
    Physics(ConditionsArgs),

    /// Tactical score and alerts for a player under given conditions
    Assess {
        #[command(flatten)]
        conditions: ConditionsArgs,
        #[command(flatten)]
        player: PlayerArgs,
    },

    /// Head-to-head, phase profile and scouting for a batter and bowler
    Matchup(MatchupArgs),

    /// Player roles and the batters and bowlers found in the match data
    Players,
}

#[derive(Args, Debug, Clone)]
pub struct ConditionsArgs {
    /// Venue name, exactly as listed by `pitchside venues`
    #[arg(long)]
    pub venue: String,

    /// Air temperature, Celsius
    #[arg(long = "temp", default_value_t = 32.0)]
    pub temperature_c: f64,

    /// Relative humidity, percent
    #[arg(long, default_value_t = 65.0)]
    pub humidity: f64,

    /// Cloud cover, percent
    #[arg(long, default_value_t = 20.0)]
    pub clouds: f64,

    /// Match start: RFC 3339, or YYYY-MM-DDTHH:MM in venue-local time. Defaults to now.
    #[arg(long)]
    pub match_time: Option<String>,
}

impl ConditionsArgs {
    pub fn to_request(&self) -> ConditionsRequest {
        ConditionsRequest {
            venue: self.venue.clone(),
            temperature_c: self.temperature_c,
            humidity_pct: self.humidity,
            cloud_cover_pct: self.clouds,
            match_time: self.match_time.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PlayerArgs {
    #[arg(long = "player", default_value = "Player")]
    pub name: String,

    /// Power Hitter, Anchor, Wrist Spinner or Swing Bowler
    #[arg(long)]
    pub role: String,

    #[arg(long, default_value_t = 80)]
    pub pressure: u32,

    #[arg(long = "spin-skill", default_value_t = 70)]
    pub spin_skill: u32,

    #[arg(long, default_value_t = 60)]
    pub acceleration: u32,
}

impl PlayerArgs {
    pub fn to_request(&self) -> PlayerRequest {
        PlayerRequest {
            name: self.name.clone(),
            role: self.role.clone(),
            pressure_resistance: self.pressure,
            spin_skill: self.spin_skill,
            acceleration_rating: self.acceleration,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct MatchupArgs {
    /// Batter name as it appears in the match data
    #[arg(long)]
    pub batter: String,

    /// Bowler name as it appears in the match data
    #[arg(long)]
    pub bowler: String,
}
