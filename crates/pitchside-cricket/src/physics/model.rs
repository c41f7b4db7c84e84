// Pitch-behaviour coefficients from venue attributes and match weather.
//
// All three coefficients are step or linear rules over the inputs. The model
// never reads a clock: the match-local time arrives inside `WeatherInput`.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::Serialize;

use super::venue::{SoilType, VenueProfile};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Grip every surface offers.
pub const BASE_SPIN_INDEX: f64 = 0.4;
/// Extra grip once black soil starts to crack.
pub const THERMAL_CRACK_BONUS: f64 = 0.4;
/// Black soil cracks strictly above this temperature (Celsius).
pub const THERMAL_CRACK_TEMP_C: f64 = 31.0;
/// Altitude (metres) that cancels one full unit of swing.
pub const ALTITUDE_SWING_SCALE_M: f64 = 2000.0;

pub const DEW_HIGH: f64 = 0.85;
pub const DEW_LOW: f64 = 0.1;
/// Dew needs humidity strictly above this percentage.
pub const DEW_HUMIDITY_PCT: f64 = 70.0;
/// Night runs from this hour (inclusive)...
pub const NIGHT_START_HOUR: u32 = 18;
/// ...through this hour (inclusive) the next morning.
pub const NIGHT_END_HOUR: u32 = 4;

/// Dew factors above this are reported as critical.
pub const DEW_CRITICAL_THRESHOLD: f64 = 0.7;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Match conditions for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherInput {
    pub temperature_c: f64,
    /// Relative humidity, 0-100.
    pub humidity_pct: f64,
    /// Cloud cover, 0-100.
    pub cloud_cover_pct: f64,
    /// Match time in the venue's local offset.
    pub timestamp: DateTime<FixedOffset>,
}

impl WeatherInput {
    /// Hour of day on the venue clock.
    pub fn local_hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Derived pitch coefficients, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchPhysics {
    pub swing_probability: f64,
    pub spin_index: f64,
    pub dew_factor: f64,
}

impl PitchPhysics {
    pub fn swing_pct(&self) -> u32 {
        to_pct(self.swing_probability)
    }

    pub fn spin_pct(&self) -> u32 {
        to_pct(self.spin_index)
    }

    pub fn dew_pct(&self) -> u32 {
        to_pct(self.dew_factor)
    }

    /// "CRITICAL" when dew will affect grip, otherwise "Safe".
    pub fn dew_risk_label(&self) -> &'static str {
        if self.dew_factor > DEW_CRITICAL_THRESHOLD {
            "CRITICAL"
        } else {
            "Safe"
        }
    }
}

/// Whole percent, truncated.
fn to_pct(value: f64) -> u32 {
    (value.clamp(0.0, 1.0) * 100.0) as u32
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Compute swing, spin and dew coefficients for a venue under given weather.
pub fn compute_physics(venue: &VenueProfile, weather: &WeatherInput) -> PitchPhysics {
    PitchPhysics {
        swing_probability: swing_probability(venue.altitude_m, weather),
        spin_index: spin_index(venue.soil_type, weather.temperature_c),
        dew_factor: dew_factor(weather.local_hour(), weather.humidity_pct),
    }
}

/// Step function: black soil above the cracking temperature doubles the grip.
pub fn spin_index(soil: SoilType, temperature_c: f64) -> f64 {
    let bonus = if soil == SoilType::Black && temperature_c > THERMAL_CRACK_TEMP_C {
        THERMAL_CRACK_BONUS
    } else {
        0.0
    };
    (BASE_SPIN_INDEX + bonus).clamp(BASE_SPIN_INDEX, BASE_SPIN_INDEX + THERMAL_CRACK_BONUS)
}

/// Humid, overcast air aids swing; thin air at altitude takes it away.
pub fn swing_probability(altitude_m: f64, weather: &WeatherInput) -> f64 {
    let base = (weather.humidity_pct / 100.0) * (weather.cloud_cover_pct / 100.0);
    let altitude_penalty = altitude_m / ALTITUDE_SWING_SCALE_M;
    (base - altitude_penalty).clamp(0.0, 1.0)
}

/// Night-time dew under high humidity.
pub fn dew_factor(local_hour: u32, humidity_pct: f64) -> f64 {
    let is_night = local_hour >= NIGHT_START_HOUR || local_hour <= NIGHT_END_HOUR;
    if is_night && humidity_pct > DEW_HUMIDITY_PCT {
        DEW_HIGH
    } else {
        DEW_LOW
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::venue::{Drainage, VenueCatalog};
    use chrono::TimeZone;

    const IST_SECS: i32 = 330 * 60;

    fn at_hour(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(IST_SECS)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 12, hour, 30, 0)
            .unwrap()
    }

    fn weather(temp: f64, humidity: f64, clouds: f64, hour: u32) -> WeatherInput {
        WeatherInput {
            temperature_c: temp,
            humidity_pct: humidity,
            cloud_cover_pct: clouds,
            timestamp: at_hour(hour),
        }
    }

    fn venue(soil: SoilType, altitude: f64) -> VenueProfile {
        VenueProfile::new("Test Ground", soil, 0.5, altitude, 25.0, Drainage::Medium, 330).unwrap()
    }

    // -- Worked example --

    #[test]
    fn chepauk_hot_afternoon() {
        let catalog = VenueCatalog::builtin();
        let chepauk = catalog.get("Chepauk, Chennai").unwrap();
        let physics = compute_physics(chepauk, &weather(33.0, 75.0, 20.0, 14));

        assert!((physics.spin_index - 0.8).abs() < 1e-12);
        assert!((physics.swing_probability - 0.1475).abs() < 1e-12);
        assert!((physics.dew_factor - DEW_LOW).abs() < f64::EPSILON);
        assert_eq!(physics.spin_pct(), 80);
        assert_eq!(physics.swing_pct(), 14);
        assert_eq!(physics.dew_risk_label(), "Safe");
    }

    // -- Spin --

    #[test]
    fn black_soil_spin_steps_above_31() {
        assert!((spin_index(SoilType::Black, 31.0) - 0.4).abs() < f64::EPSILON);
        assert!((spin_index(SoilType::Black, 31.01) - 0.8).abs() < 1e-12);
        assert!((spin_index(SoilType::Black, 45.0) - 0.8).abs() < 1e-12);
        assert!((spin_index(SoilType::Black, 10.0) - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn other_soils_never_crack() {
        for soil in [SoilType::Red, SoilType::ClayHeavy, SoilType::Loam] {
            for temp in [10.0, 31.0, 32.0, 45.0] {
                assert!((spin_index(soil, temp) - 0.4).abs() < f64::EPSILON);
            }
        }
    }

    // -- Swing --

    #[test]
    fn no_humidity_or_no_cloud_means_no_swing() {
        for altitude in [0.0, 5.0, 35.0, 2500.0] {
            let v = venue(SoilType::Red, altitude);
            let dry = compute_physics(&v, &weather(25.0, 0.0, 90.0, 12));
            let clear = compute_physics(&v, &weather(25.0, 90.0, 0.0, 12));
            assert_eq!(dry.swing_probability, 0.0);
            assert_eq!(clear.swing_probability, 0.0);
        }
    }

    #[test]
    fn altitude_floors_swing_at_zero() {
        let v = venue(SoilType::Loam, 1800.0);
        let physics = compute_physics(&v, &weather(25.0, 80.0, 80.0, 12));
        // 0.64 - 0.9 < 0
        assert_eq!(physics.swing_probability, 0.0);
    }

    #[test]
    fn swing_is_capped_at_one() {
        let v = venue(SoilType::Loam, 0.0);
        let physics = compute_physics(&v, &weather(25.0, 100.0, 100.0, 12));
        assert!((physics.swing_probability - 1.0).abs() < f64::EPSILON);
        assert_eq!(physics.swing_pct(), 100);
    }

    // -- Dew --

    #[test]
    fn dew_only_takes_two_values() {
        for hour in 0..24 {
            for humidity in [0.0, 50.0, 70.0, 70.5, 80.0, 100.0] {
                let d = dew_factor(hour, humidity);
                assert!(d == DEW_HIGH || d == DEW_LOW, "hour {hour} humidity {humidity}");
            }
        }
    }

    #[test]
    fn dew_window_boundaries() {
        assert_eq!(dew_factor(18, 80.0), DEW_HIGH);
        assert_eq!(dew_factor(23, 80.0), DEW_HIGH);
        assert_eq!(dew_factor(0, 80.0), DEW_HIGH);
        assert_eq!(dew_factor(4, 80.0), DEW_HIGH);
        assert_eq!(dew_factor(5, 80.0), DEW_LOW);
        assert_eq!(dew_factor(17, 80.0), DEW_LOW);
        // Humidity must be strictly above 70.
        assert_eq!(dew_factor(20, 70.0), DEW_LOW);
    }

    #[test]
    fn dew_uses_venue_local_hour() {
        // 14:00 UTC is 19:30 in Chennai.
        let utc_afternoon = chrono::Utc.with_ymd_and_hms(2024, 4, 12, 14, 0, 0).unwrap();
        let local = utc_afternoon.with_timezone(&FixedOffset::east_opt(IST_SECS).unwrap());
        let w = WeatherInput {
            temperature_c: 30.0,
            humidity_pct: 85.0,
            cloud_cover_pct: 10.0,
            timestamp: local,
        };
        assert_eq!(w.local_hour(), 19);
        let physics = compute_physics(&venue(SoilType::Red, 10.0), &w);
        assert_eq!(physics.dew_factor, DEW_HIGH);
        assert_eq!(physics.dew_risk_label(), "CRITICAL");
    }
}
