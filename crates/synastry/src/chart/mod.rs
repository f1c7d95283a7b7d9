pub mod geometry;
pub mod types;

pub use geometry::{
    angular_separation, build_house_cusps, degree_to_sign, midpoint_longitude,
    normalize_longitude, position_at, resolve_house, round2, to_longitude,
};
pub use types::{
    BirthAccuracy, BirthInput, Dominance, NatalChart, PlanetPosition, UnknownSign, ZodiacSign,
    ALL_BODIES, ASCENDANT, ASPECT_BODIES, MAJOR_PLANETS,
};

/// Equal-house cusps for a chart, derived from its Ascendant. Empty when the
/// chart carries no Ascendant.
pub fn chart_house_cusps(positions: &[PlanetPosition]) -> Vec<f64> {
    positions
        .iter()
        .find(|p| p.name == ASCENDANT)
        .map(|asc| build_house_cusps(to_longitude(asc)))
        .unwrap_or_default()
}
