use crate::chart::{
    build_house_cusps, midpoint_longitude, position_at, resolve_house, to_longitude,
    PlanetPosition, ALL_BODIES, ASCENDANT,
};

/// Build the midpoint chart of two position lists.
///
/// Only bodies present in both charts are included, in [`ALL_BODIES`]
/// order. Houses come from the composite's own Ascendant; without one
/// every house stays unset.
pub fn build_composite(
    positions_a: &[PlanetPosition],
    positions_b: &[PlanetPosition],
) -> Vec<PlanetPosition> {
    let mut composite: Vec<(PlanetPosition, f64)> = ALL_BODIES
        .iter()
        .filter_map(|body| {
            let a = positions_a.iter().find(|p| p.name == *body)?;
            let b = positions_b.iter().find(|p| p.name == *body)?;
            let lon = midpoint_longitude(to_longitude(a), to_longitude(b));
            // midpoints have no direction of motion
            Some((position_at(body, lon, false), lon))
        })
        .collect();

    let ascendant = composite
        .iter()
        .find(|(p, _)| p.name == ASCENDANT)
        .map(|(_, lon)| *lon);

    match ascendant {
        Some(asc) => {
            let cusps = build_house_cusps(asc);
            for (position, lon) in composite.iter_mut() {
                position.house = resolve_house(*lon, &cusps);
            }
        }
        None => log::debug!("composite chart has no Ascendant; houses left unset"),
    }

    composite.into_iter().map(|(p, _)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_uses_short_arc() {
        let a = vec![position_at("Sun", 350.0, false)];
        let b = vec![position_at("Sun", 10.0, false)];
        let composite = build_composite(&a, &b);
        assert_eq!(composite.len(), 1);
        assert_eq!(composite[0].sign, "Aries");
        assert_eq!(composite[0].degree, 0);
        assert_eq!(composite[0].minute, 0);
    }

    #[test]
    fn test_composite_intersects_bodies() {
        let a = vec![position_at("Sun", 10.0, false), position_at("Juno", 40.0, false)];
        let b = vec![position_at("Sun", 20.0, false), position_at("Moon", 80.0, false)];
        let composite = build_composite(&a, &b);
        assert_eq!(composite.len(), 1);
        assert_eq!(composite[0].name, "Sun");
        assert_eq!(composite[0].degree, 15);
        assert_eq!(composite[0].house, None);
    }

    #[test]
    fn test_composite_is_never_retrograde() {
        let a = vec![position_at("Mercury", 100.0, true)];
        let b = vec![position_at("Mercury", 104.0, true)];
        assert!(!build_composite(&a, &b)[0].is_retrograde);
    }

    #[test]
    fn test_composite_houses_from_composite_ascendant() {
        let a = vec![position_at(ASCENDANT, 0.0, false), position_at("Venus", 60.0, false)];
        let b = vec![position_at(ASCENDANT, 60.0, false), position_at("Venus", 100.0, false)];
        // composite Asc at 30°, composite Venus at 80° -> 2nd house
        let composite = build_composite(&a, &b);
        let venus = composite.iter().find(|p| p.name == "Venus").unwrap();
        assert_eq!(venus.house, Some(2));
        let asc = composite.iter().find(|p| p.name == ASCENDANT).unwrap();
        assert_eq!(asc.house, Some(1));
    }
}
