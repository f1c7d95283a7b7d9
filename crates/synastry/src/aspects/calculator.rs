use crate::aspects::types::{Aspect, AspectDefinition, AspectType, ASPECT_DEFINITIONS};
use crate::chart::{angular_separation, round2, to_longitude, PlanetPosition, ASPECT_BODIES};

/// Aspect calculator over a fixed, ordered definition table.
pub struct AspectCalculator {
    definitions: &'static [AspectDefinition],
}

impl AspectCalculator {
    /// Create a calculator using the standard definition table
    pub fn new() -> Self {
        Self {
            definitions: ASPECT_DEFINITIONS,
        }
    }

    /// Compute aspects between two charts (every body of `a` against every
    /// body of `b`, same-named bodies included).
    pub fn compute_cross_aspects(
        &self,
        positions_a: &[PlanetPosition],
        positions_b: &[PlanetPosition],
    ) -> Vec<Aspect> {
        let bodies_a = aspect_eligible(positions_a);
        let bodies_b = aspect_eligible(positions_b);

        let mut aspects = Vec::new();
        for (name_a, lon_a) in &bodies_a {
            for (name_b, lon_b) in &bodies_b {
                if let Some((aspect_type, orb)) = self.calculate_aspect(*lon_a, *lon_b) {
                    aspects.push(build_aspect(name_a, name_b, aspect_type, orb));
                }
            }
        }
        aspects
    }

    /// Compute aspects within a single chart (each unordered pair once)
    pub fn compute_chart_aspects(&self, positions: &[PlanetPosition]) -> Vec<Aspect> {
        let bodies = aspect_eligible(positions);

        // Early exit if not enough bodies
        if bodies.len() < 2 {
            return Vec::new();
        }

        let mut aspects = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (name_i, lon_i) = &bodies[i];
                let (name_j, lon_j) = &bodies[j];
                if let Some((aspect_type, orb)) = self.calculate_aspect(*lon_i, *lon_j) {
                    aspects.push(build_aspect(name_i, name_j, aspect_type, orb));
                }
            }
        }
        aspects
    }

    /// Classify the separation between two longitudes. Returns the aspect
    /// type and the unrounded orb of the first matching definition.
    pub fn calculate_aspect(&self, lon1: f64, lon2: f64) -> Option<(AspectType, f64)> {
        let angle = angular_separation(lon1, lon2);

        for definition in self.definitions {
            let orb = (angle - definition.angle).abs();
            if orb <= definition.orb {
                return Some((definition.aspect_type, orb));
            }
        }

        None
    }
}

impl Default for AspectCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Restrict to aspect-eligible bodies, keeping chart order.
fn aspect_eligible(positions: &[PlanetPosition]) -> Vec<(&str, f64)> {
    positions
        .iter()
        .filter(|p| ASPECT_BODIES.contains(&p.name.as_str()))
        .map(|p| (p.name.as_str(), to_longitude(p)))
        .collect()
}

fn build_aspect(planet1: &str, planet2: &str, aspect_type: AspectType, orb: f64) -> Aspect {
    Aspect {
        planet1: planet1.to_string(),
        planet2: planet2.to_string(),
        aspect_type,
        orb: round2(orb),
        is_applying: false,
    }
}
