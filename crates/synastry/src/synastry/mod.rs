pub mod composite;
pub mod overlays;
pub mod types;

pub use composite::build_composite;
pub use overlays::{build_house_overlays, build_mutual_overlays};
pub use types::{HouseOverlay, OverlayPerson, SynastryData};

use crate::aspects::AspectCalculator;
use crate::chart::{chart_house_cusps, NatalChart};

/// Cross aspects and mutual house overlays for two charts.
pub fn compute_synastry(chart_a: &NatalChart, chart_b: &NatalChart) -> SynastryData {
    let calculator = AspectCalculator::new();
    let aspects = calculator.compute_cross_aspects(&chart_a.positions, &chart_b.positions);

    let cusps_a = chart_house_cusps(&chart_a.positions);
    let cusps_b = chart_house_cusps(&chart_b.positions);
    let house_overlays =
        build_mutual_overlays(&chart_a.positions, &cusps_a, &chart_b.positions, &cusps_b);

    SynastryData {
        aspects,
        house_overlays,
    }
}
