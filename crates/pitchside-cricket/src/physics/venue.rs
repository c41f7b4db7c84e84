// Venue catalog: geophysical attributes per ground.
//
// The catalog is built once at startup (built-in grounds plus any configured
// extras) and handed to callers; the physics model only ever sees a single
// `VenueProfile`.

use chrono::{FixedOffset, Offset, Utc};
use pitchside_core::config::VenueConfig;
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("unknown venue: {name}")]
    UnknownVenue { name: String },

    #[error("venue `{venue}`: unknown soil type `{value}`")]
    UnknownSoil { venue: String, value: String },

    #[error("venue `{venue}`: unknown drainage level `{value}`")]
    UnknownDrainage { venue: String, value: String },

    #[error("venue `{venue}`: {message}")]
    Invalid { venue: String, message: String },
}

// ---------------------------------------------------------------------------
// Soil and drainage
// ---------------------------------------------------------------------------

/// Dominant soil of the pitch square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoilType {
    Red,
    /// Black cotton soil; cracks and grips in sustained heat.
    Black,
    ClayHeavy,
    Loam,
}

impl SoilType {
    /// Parse a soil label. Accepts "Clay-Heavy", "clay heavy" and "ClayHeavy".
    pub fn from_label(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "red" => Some(SoilType::Red),
            "black" => Some(SoilType::Black),
            "clayheavy" => Some(SoilType::ClayHeavy),
            "loam" => Some(SoilType::Loam),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SoilType::Red => "Red",
            SoilType::Black => "Black",
            SoilType::ClayHeavy => "Clay-Heavy",
            SoilType::Loam => "Loam",
        }
    }
}

/// How quickly the square sheds water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Drainage {
    Low,
    Medium,
    High,
    Extreme,
}

impl Drainage {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Drainage::Low),
            "medium" => Some(Drainage::Medium),
            "high" => Some(Drainage::High),
            "extreme" => Some(Drainage::Extreme),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Drainage::Low => "Low",
            Drainage::Medium => "Medium",
            Drainage::High => "High",
            Drainage::Extreme => "Extreme",
        }
    }
}

// ---------------------------------------------------------------------------
// Venue profile
// ---------------------------------------------------------------------------

/// Static attributes of a ground.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueProfile {
    /// Unique catalog key, e.g. "Chepauk, Chennai".
    pub name: String,
    pub soil_type: SoilType,
    /// Clay share of the topsoil, 0.0-1.0.
    pub clay_fraction: f64,
    /// Metres above sea level.
    pub altitude_m: f64,
    pub avg_temp_c: f64,
    pub drainage: Drainage,
    /// Venue-local clock offset from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl VenueProfile {
    /// Build a profile, checking the numeric ranges.
    pub fn new(
        name: &str,
        soil_type: SoilType,
        clay_fraction: f64,
        altitude_m: f64,
        avg_temp_c: f64,
        drainage: Drainage,
        utc_offset_minutes: i32,
    ) -> Result<Self, VenueError> {
        let name = name.trim();
        let invalid = |message: String| VenueError::Invalid {
            venue: name.to_string(),
            message,
        };
        if name.is_empty() {
            return Err(invalid("name must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&clay_fraction) {
            return Err(invalid(format!(
                "clay_fraction must be in [0, 1], got {clay_fraction}"
            )));
        }
        if !altitude_m.is_finite() || altitude_m < 0.0 {
            return Err(invalid(format!("altitude_m must be >= 0, got {altitude_m}")));
        }
        if !avg_temp_c.is_finite() {
            return Err(invalid("avg_temp_c must be finite".into()));
        }
        if FixedOffset::east_opt(utc_offset_minutes * 60).is_none() {
            return Err(invalid(format!(
                "utc_offset_minutes out of range: {utc_offset_minutes}"
            )));
        }
        Ok(VenueProfile {
            name: name.to_string(),
            soil_type,
            clay_fraction,
            altitude_m,
            avg_temp_c,
            drainage,
            utc_offset_minutes,
        })
    }

    /// Build a profile from a configuration entry.
    pub fn from_config(cfg: &VenueConfig) -> Result<Self, VenueError> {
        let soil = SoilType::from_label(&cfg.soil).ok_or_else(|| VenueError::UnknownSoil {
            venue: cfg.name.clone(),
            value: cfg.soil.clone(),
        })?;
        let drainage =
            Drainage::from_label(&cfg.drainage).ok_or_else(|| VenueError::UnknownDrainage {
                venue: cfg.name.clone(),
                value: cfg.drainage.clone(),
            })?;
        VenueProfile::new(
            &cfg.name,
            soil,
            cfg.clay_fraction,
            cfg.altitude_m,
            cfg.avg_temp_c,
            drainage,
            cfg.utc_offset_minutes,
        )
    }

    /// The venue's local offset. Offsets are range-checked on construction.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Built-in grounds: (name, soil, clay, altitude, avg temp, drainage, utc offset minutes).
const BUILTIN_VENUES: &[(&str, SoilType, f64, f64, f64, Drainage, i32)] = &[
    ("Wankhede, Mumbai", SoilType::Red, 0.40, 10.0, 30.0, Drainage::High, 330),
    ("Chepauk, Chennai", SoilType::Black, 0.70, 5.0, 33.0, Drainage::Medium, 330),
    ("Perth (Optus), AUS", SoilType::ClayHeavy, 0.80, 20.0, 28.0, Drainage::Extreme, 480),
    ("Lord's, London", SoilType::Loam, 0.30, 35.0, 22.0, Drainage::Low, 0),
];

/// Immutable venue lookup, in declaration order.
#[derive(Debug, Clone)]
pub struct VenueCatalog {
    venues: Vec<VenueProfile>,
}

impl VenueCatalog {
    /// The four built-in grounds.
    pub fn builtin() -> Self {
        let venues = BUILTIN_VENUES
            .iter()
            .map(|&(name, soil_type, clay_fraction, altitude_m, avg_temp_c, drainage, offset)| {
                VenueProfile {
                    name: name.to_string(),
                    soil_type,
                    clay_fraction,
                    altitude_m,
                    avg_temp_c,
                    drainage,
                    utc_offset_minutes: offset,
                }
            })
            .collect();
        VenueCatalog { venues }
    }

    /// Built-in grounds overlaid with configured ones. A configured venue
    /// whose name matches a built-in one replaces it in place.
    pub fn with_overrides(extra: &[VenueConfig]) -> Result<Self, VenueError> {
        let mut catalog = Self::builtin();
        for cfg in extra {
            let profile = VenueProfile::from_config(cfg)?;
            match catalog.venues.iter_mut().find(|v| v.name == profile.name) {
                Some(existing) => *existing = profile,
                None => catalog.venues.push(profile),
            }
        }
        Ok(catalog)
    }

    /// Look up a venue by its exact name.
    pub fn get(&self, name: &str) -> Result<&VenueProfile, VenueError> {
        self.venues
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| VenueError::UnknownVenue {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.venues.iter().map(|v| v.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VenueProfile> {
        self.venues.iter()
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

impl Default for VenueCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(name: &str, soil: &str, drainage: &str) -> VenueConfig {
        VenueConfig {
            name: name.into(),
            soil: soil.into(),
            clay_fraction: 0.5,
            altitude_m: 100.0,
            avg_temp_c: 25.0,
            drainage: drainage.into(),
            utc_offset_minutes: 60,
        }
    }

    #[test]
    fn builtin_catalog_has_four_grounds_in_order() {
        let catalog = VenueCatalog::builtin();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            vec![
                "Wankhede, Mumbai",
                "Chepauk, Chennai",
                "Perth (Optus), AUS",
                "Lord's, London"
            ]
        );
    }

    #[test]
    fn chepauk_attributes() {
        let catalog = VenueCatalog::builtin();
        let v = catalog.get("Chepauk, Chennai").unwrap();
        assert_eq!(v.soil_type, SoilType::Black);
        assert!((v.clay_fraction - 0.70).abs() < f64::EPSILON);
        assert!((v.altitude_m - 5.0).abs() < f64::EPSILON);
        assert_eq!(v.drainage, Drainage::Medium);
        assert_eq!(v.utc_offset().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn unknown_venue_is_error() {
        let catalog = VenueCatalog::builtin();
        let err = catalog.get("chepauk, chennai").unwrap_err();
        assert!(matches!(err, VenueError::UnknownVenue { .. }));
    }

    #[test]
    fn soil_labels_parse_loosely() {
        assert_eq!(SoilType::from_label("Clay-Heavy"), Some(SoilType::ClayHeavy));
        assert_eq!(SoilType::from_label("clay heavy"), Some(SoilType::ClayHeavy));
        assert_eq!(SoilType::from_label("BLACK"), Some(SoilType::Black));
        assert_eq!(SoilType::from_label("sand"), None);
    }

    #[test]
    fn configured_venue_is_appended() {
        let catalog =
            VenueCatalog::with_overrides(&[cfg("Eden Gardens, Kolkata", "Loam", "High")]).unwrap();
        assert_eq!(catalog.len(), 5);
        let v = catalog.get("Eden Gardens, Kolkata").unwrap();
        assert_eq!(v.soil_type, SoilType::Loam);
        assert_eq!(v.drainage, Drainage::High);
    }

    #[test]
    fn configured_venue_replaces_builtin() {
        let catalog =
            VenueCatalog::with_overrides(&[cfg("Lord's, London", "Red", "Medium")]).unwrap();
        assert_eq!(catalog.len(), 4);
        let v = catalog.get("Lord's, London").unwrap();
        assert_eq!(v.soil_type, SoilType::Red);
        // Order is kept.
        assert_eq!(catalog.names().last(), Some("Lord's, London"));
    }

    #[test]
    fn configured_unknown_soil_rejected() {
        let err = VenueCatalog::with_overrides(&[cfg("X", "Sand", "Low")]).unwrap_err();
        assert!(matches!(err, VenueError::UnknownSoil { .. }));
    }

    #[test]
    fn configured_unknown_drainage_rejected() {
        let err = VenueCatalog::with_overrides(&[cfg("X", "Red", "Swamp")]).unwrap_err();
        assert!(matches!(err, VenueError::UnknownDrainage { .. }));
    }

    #[test]
    fn profile_rejects_bad_ranges() {
        assert!(VenueProfile::new("A", SoilType::Red, 1.2, 0.0, 20.0, Drainage::Low, 0).is_err());
        assert!(VenueProfile::new("A", SoilType::Red, 0.2, -1.0, 20.0, Drainage::Low, 0).is_err());
        assert!(VenueProfile::new(" ", SoilType::Red, 0.2, 0.0, 20.0, Drainage::Low, 0).is_err());
        assert!(
            VenueProfile::new("A", SoilType::Red, 0.2, 0.0, 20.0, Drainage::Low, 100_000).is_err()
        );
    }
}
