//! Circular longitude arithmetic and the equal-house system.

use crate::chart::types::{PlanetPosition, ZodiacSign};

/// Absorbs float representation error before flooring to whole minutes,
/// e.g. 40.3333.. % 1 * 60 landing on 19.999999.
const MINUTE_EPSILON: f64 = 1e-9;

/// Map any degree value into [0, 360).
pub fn normalize_longitude(longitude: f64) -> f64 {
    let lon = longitude.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if lon >= 360.0 {
        0.0
    } else {
        lon
    }
}

/// Absolute ecliptic longitude of a charted body.
///
/// An unrecognized sign yields 0.0 and a warning rather than an error.
pub fn to_longitude(position: &PlanetPosition) -> f64 {
    match position.sign.parse::<ZodiacSign>() {
        Ok(sign) => {
            sign.index() as f64 * 30.0 + position.degree as f64 + position.minute as f64 / 60.0
        }
        Err(err) => {
            log::warn!("{} for body {}; using longitude 0", err, position.name);
            0.0
        }
    }
}

/// Sign, whole degree and whole minute for a longitude.
pub fn degree_to_sign(longitude: f64) -> (ZodiacSign, u8, u8) {
    let lon = normalize_longitude(longitude);
    let sign_index = ((lon / 30.0).floor() as usize).min(11);
    let in_sign = lon - sign_index as f64 * 30.0;
    let degree = (in_sign.floor() as u8).min(29);
    let minute = (((in_sign - degree as f64) * 60.0 + MINUTE_EPSILON).floor() as u8).min(59);
    (ZodiacSign::from_index(sign_index), degree, minute)
}

/// Build a position record for a longitude.
pub fn position_at(name: &str, longitude: f64, is_retrograde: bool) -> PlanetPosition {
    let (sign, degree, minute) = degree_to_sign(longitude);
    PlanetPosition {
        name: name.to_string(),
        sign: sign.name().to_string(),
        degree,
        minute,
        house: None,
        is_retrograde,
    }
}

/// Equal-house cusps: twelve 30° houses starting at the ascendant.
pub fn build_house_cusps(ascendant_longitude: f64) -> Vec<f64> {
    (0..12)
        .map(|i| normalize_longitude(ascendant_longitude + i as f64 * 30.0))
        .collect()
}

/// House (1-12) containing `longitude`, or `None` when fewer than twelve
/// cusps are supplied.
pub fn resolve_house(longitude: f64, cusps: &[f64]) -> Option<u8> {
    if cusps.len() < 12 {
        return None;
    }
    let lon = normalize_longitude(longitude);
    for house in 0..12 {
        let start = normalize_longitude(cusps[house]);
        let end = normalize_longitude(cusps[(house + 1) % 12]);
        let inside = if end <= start {
            // interval crosses 0°
            lon >= start || lon < end
        } else {
            lon >= start && lon < end
        };
        if inside {
            return Some(house as u8 + 1);
        }
    }
    None
}

/// Midpoint on the shorter arc between two longitudes.
pub fn midpoint_longitude(lon_a: f64, lon_b: f64) -> f64 {
    let diff = (lon_b - lon_a + 540.0).rem_euclid(360.0) - 180.0;
    normalize_longitude(lon_a + diff / 2.0)
}

/// Smallest separation between two longitudes, in [0, 180].
pub fn angular_separation(lon_a: f64, lon_b: f64) -> f64 {
    let diff = (normalize_longitude(lon_a) - normalize_longitude(lon_b)).abs();
    diff.min(360.0 - diff)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
