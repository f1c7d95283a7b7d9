use crate::chart::{resolve_house, to_longitude, PlanetPosition, MAJOR_PLANETS};
use crate::synastry::types::{HouseOverlay, OverlayPerson};

/// Place the major planets of one chart into another chart's houses.
/// Planets that are missing, or that resolve to no house, are skipped.
pub fn build_house_overlays(
    positions: &[PlanetPosition],
    target_cusps: &[f64],
    person: OverlayPerson,
) -> Vec<HouseOverlay> {
    MAJOR_PLANETS
        .iter()
        .filter_map(|planet| {
            let position = positions.iter().find(|p| p.name == *planet)?;
            let house = resolve_house(to_longitude(position), target_cusps)?;
            Some(HouseOverlay {
                planet: planet.to_string(),
                house,
                person,
            })
        })
        .collect()
}

/// A's planets in B's houses followed by B's planets in A's houses.
pub fn build_mutual_overlays(
    positions_a: &[PlanetPosition],
    cusps_a: &[f64],
    positions_b: &[PlanetPosition],
    cusps_b: &[f64],
) -> Vec<HouseOverlay> {
    let mut overlays = build_house_overlays(positions_a, cusps_b, OverlayPerson::A);
    overlays.extend(build_house_overlays(positions_b, cusps_a, OverlayPerson::B));
    overlays
}
