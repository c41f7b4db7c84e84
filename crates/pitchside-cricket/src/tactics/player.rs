// Player DNA: archetype plus three 0-100 behavioural ratings.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Upper bound of every player rating.
pub const MAX_RATING: u8 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("unknown player role `{0}`")]
    UnknownRole(String),

    #[error("{field} must be between 0 and 100, got {value}")]
    RatingOutOfRange { field: &'static str, value: u32 },
}

/// Player archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlayerRole {
    PowerHitter,
    Anchor,
    WristSpinner,
    SwingBowler,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 4] = [
        PlayerRole::PowerHitter,
        PlayerRole::Anchor,
        PlayerRole::WristSpinner,
        PlayerRole::SwingBowler,
    ];

    /// Parse "Power Hitter", "power-hitter", "power_hitter" or "PowerHitter".
    pub fn from_label(s: &str) -> Result<Self, PlayerError> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "powerhitter" => Ok(PlayerRole::PowerHitter),
            "anchor" => Ok(PlayerRole::Anchor),
            "wristspinner" => Ok(PlayerRole::WristSpinner),
            "swingbowler" => Ok(PlayerRole::SwingBowler),
            _ => Err(PlayerError::UnknownRole(s.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerRole::PowerHitter => "Power Hitter",
            PlayerRole::Anchor => "Anchor",
            PlayerRole::WristSpinner => "Wrist Spinner",
            PlayerRole::SwingBowler => "Swing Bowler",
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A player as described for one tactical request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerProfile {
    pub name: String,
    pub role: PlayerRole,
    pub pressure_resistance: u8,
    pub spin_skill: u8,
    pub acceleration_rating: u8,
}

impl PlayerProfile {
    /// Build a profile, rejecting ratings above 100.
    pub fn new(
        name: &str,
        role: PlayerRole,
        pressure_resistance: u32,
        spin_skill: u32,
        acceleration_rating: u32,
    ) -> Result<Self, PlayerError> {
        Ok(PlayerProfile {
            name: name.trim().to_string(),
            role,
            pressure_resistance: rating("pressure_resistance", pressure_resistance)?,
            spin_skill: rating("spin_skill", spin_skill)?,
            acceleration_rating: rating("acceleration_rating", acceleration_rating)?,
        })
    }
}

fn rating(field: &'static str, value: u32) -> Result<u8, PlayerError> {
    match u8::try_from(value) {
        Ok(v) if v <= MAX_RATING => Ok(v),
        _ => Err(PlayerError::RatingOutOfRange { field, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_round_trip() {
        for role in PlayerRole::ALL {
            assert_eq!(PlayerRole::from_label(role.label()), Ok(role));
        }
    }

    #[test]
    fn role_parsing_ignores_case_and_separators() {
        assert_eq!(PlayerRole::from_label("power-hitter"), Ok(PlayerRole::PowerHitter));
        assert_eq!(PlayerRole::from_label("WRIST_SPINNER"), Ok(PlayerRole::WristSpinner));
        assert_eq!(PlayerRole::from_label("SwingBowler"), Ok(PlayerRole::SwingBowler));
        assert!(matches!(
            PlayerRole::from_label("keeper"),
            Err(PlayerError::UnknownRole(_))
        ));
    }

    #[test]
    fn ratings_are_bounded() {
        let p = PlayerProfile::new(" Virat Kohli ", PlayerRole::Anchor, 100, 0, 55).unwrap();
        assert_eq!(p.name, "Virat Kohli");
        assert_eq!(p.pressure_resistance, 100);

        let err = PlayerProfile::new("X", PlayerRole::Anchor, 80, 101, 55).unwrap_err();
        assert_eq!(
            err,
            PlayerError::RatingOutOfRange {
                field: "spin_skill",
                value: 101
            }
        );
        assert!(PlayerProfile::new("X", PlayerRole::Anchor, 80, 50, 70_000).is_err());
    }
}
