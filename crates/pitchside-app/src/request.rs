// Request boundary: turns raw user input into validated engine inputs.
//
// Unknown venues and out-of-range values are rejected here, before the
// physics model or the scorer ever see them.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use pitchside_cricket::physics::model::WeatherInput;
use pitchside_cricket::physics::venue::{VenueCatalog, VenueError, VenueProfile};
use pitchside_cricket::tactics::player::{PlayerError, PlayerProfile, PlayerRole};
use thiserror::Error;

/// Temperature range accepted from callers, Celsius.
pub const TEMPERATURE_RANGE_C: (f64, f64) = (10.0, 45.0);
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);
pub const CLOUD_COVER_RANGE_PCT: (f64, f64) = (0.0, 100.0);

/// Naive formats accepted for `match_time`, read as venue-local wall time.
const NAIVE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Venue(#[from] VenueError),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid match time `{0}`: expected RFC 3339 or YYYY-MM-DDTHH:MM")]
    InvalidMatchTime(String),

    #[error(transparent)]
    Player(#[from] PlayerError),
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Raw match conditions as typed by the user.
#[derive(Debug, Clone)]
pub struct ConditionsRequest {
    pub venue: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
    /// RFC 3339 instant, or a naive venue-local time. `None` means "now".
    pub match_time: Option<String>,
}

/// Raw player attributes as typed by the user.
#[derive(Debug, Clone)]
pub struct PlayerRequest {
    pub name: String,
    pub role: String,
    pub pressure_resistance: u32,
    pub spin_skill: u32,
    pub acceleration_rating: u32,
}

/// Resolve the venue and validate the weather values. `now` is used only when
/// no match time was given.
pub fn resolve_conditions<'c>(
    catalog: &'c VenueCatalog,
    req: &ConditionsRequest,
    now: DateTime<Utc>,
) -> Result<(&'c VenueProfile, WeatherInput), RequestError> {
    let venue = catalog.get(&req.venue)?;

    check_range("temperature_c", req.temperature_c, TEMPERATURE_RANGE_C)?;
    check_range("humidity_pct", req.humidity_pct, HUMIDITY_RANGE_PCT)?;
    check_range("cloud_cover_pct", req.cloud_cover_pct, CLOUD_COVER_RANGE_PCT)?;

    let offset = venue.utc_offset();
    let timestamp = match &req.match_time {
        Some(text) => parse_match_time(text, offset)?,
        None => now.with_timezone(&offset),
    };

    Ok((
        venue,
        WeatherInput {
            temperature_c: req.temperature_c,
            humidity_pct: req.humidity_pct,
            cloud_cover_pct: req.cloud_cover_pct,
            timestamp,
        },
    ))
}

/// Validate player attributes into a profile.
pub fn resolve_player(req: &PlayerRequest) -> Result<PlayerProfile, RequestError> {
    let role = PlayerRole::from_label(&req.role)?;
    Ok(PlayerProfile::new(
        &req.name,
        role,
        req.pressure_resistance,
        req.spin_skill,
        req.acceleration_rating,
    )?)
}

/// Parse a match time into the venue's offset. An RFC 3339 instant is
/// converted; a naive time is taken as venue-local.
pub fn parse_match_time(
    text: &str,
    venue_offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, RequestError> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&venue_offset));
    }
    for format in NAIVE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return venue_offset
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| RequestError::InvalidMatchTime(text.to_string()));
        }
    }
    Err(RequestError::InvalidMatchTime(text.to_string()))
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), RequestError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RequestError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn conditions(venue: &str, temp: f64, humidity: f64, clouds: f64) -> ConditionsRequest {
        ConditionsRequest {
            venue: venue.into(),
            temperature_c: temp,
            humidity_pct: humidity,
            cloud_cover_pct: clouds,
            match_time: None,
        }
    }

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 12, 12, 0, 0).unwrap()
    }

    #[test]
    fn valid_conditions_resolve() {
        let catalog = VenueCatalog::builtin();
        let (venue, weather) =
            resolve_conditions(&catalog, &conditions("Chepauk, Chennai", 33.0, 75.0, 20.0), noon_utc())
                .unwrap();
        assert_eq!(venue.name, "Chepauk, Chennai");
        // Noon UTC is 17:30 in Chennai.
        assert_eq!(weather.local_hour(), 17);
        assert_eq!(weather.timestamp.minute(), 30);
    }

    #[test]
    fn unknown_venue_rejected() {
        let catalog = VenueCatalog::builtin();
        let err = resolve_conditions(&catalog, &conditions("Eden Park", 25.0, 50.0, 50.0), noon_utc())
            .unwrap_err();
        assert!(matches!(err, RequestError::Venue(VenueError::UnknownVenue { .. })));
    }

    #[test]
    fn out_of_range_values_rejected() {
        let catalog = VenueCatalog::builtin();
        let cases = [
            (conditions("Lord's, London", 50.0, 50.0, 50.0), "temperature_c"),
            (conditions("Lord's, London", 9.5, 50.0, 50.0), "temperature_c"),
            (conditions("Lord's, London", 20.0, 101.0, 50.0), "humidity_pct"),
            (conditions("Lord's, London", 20.0, 50.0, -1.0), "cloud_cover_pct"),
            (conditions("Lord's, London", 20.0, f64::NAN, 50.0), "humidity_pct"),
        ];
        for (req, expected) in cases {
            match resolve_conditions(&catalog, &req, noon_utc()).unwrap_err() {
                RequestError::OutOfRange { field, .. } => assert_eq!(field, expected),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn naive_match_time_is_venue_local() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let ts = parse_match_time("2024-04-12T19:30", ist).unwrap();
        assert_eq!(ts.hour(), 19);
        assert_eq!(ts.offset().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn rfc3339_match_time_is_converted() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let ts = parse_match_time("2024-04-12T14:00:00Z", ist).unwrap();
        assert_eq!(ts.hour(), 19);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn bad_match_time_rejected() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(matches!(
            parse_match_time("tonight", utc),
            Err(RequestError::InvalidMatchTime(_))
        ));
    }

    #[test]
    fn player_request_resolves() {
        let req = PlayerRequest {
            name: "Virat Kohli".into(),
            role: "anchor".into(),
            pressure_resistance: 80,
            spin_skill: 70,
            acceleration_rating: 60,
        };
        let player = resolve_player(&req).unwrap();
        assert_eq!(player.role, PlayerRole::Anchor);

        let bad_role = PlayerRequest {
            role: "keeper".into(),
            ..req.clone()
        };
        assert!(matches!(resolve_player(&bad_role), Err(RequestError::Player(_))));

        let bad_rating = PlayerRequest {
            spin_skill: 120,
            ..req
        };
        assert!(matches!(resolve_player(&bad_rating), Err(RequestError::Player(_))));
    }
}
