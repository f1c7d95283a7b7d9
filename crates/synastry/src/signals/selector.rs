use crate::aspects::{Aspect, AspectType};
use crate::scoring::{aspect_weight, Signal};
use crate::signals::tables::{
    Dimension, PlanetPair, SectionTable, TightAspectRule, OVERLAY_HOUSE_PRIORITY,
    OVERLAY_PLANET_PRIORITY, UNRANKED,
};
use crate::synastry::{HouseOverlay, SynastryData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSignals {
    pub name: String,
    pub signals: Vec<Signal>,
}

/// Everything a section table selects out of one synastry computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSignals {
    pub dimensions: Vec<DimensionSignals>,
    pub sweet: Vec<Signal>,
    pub friction: Vec<Signal>,
    pub overlays: Vec<HouseOverlay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tight_aspects: Vec<Signal>,
}

fn matches_any_pair(aspect: &Aspect, pairs: &[PlanetPair]) -> bool {
    pairs.iter().any(|(a, b)| aspect.connects(a, b))
}

/// Strongest first; the sort is stable so equal weights keep input order.
fn rank_by_weight(mut aspects: Vec<&Aspect>, cap: usize) -> Vec<Signal> {
    aspects.sort_by(|a, b| aspect_weight(b).total_cmp(&aspect_weight(a)));
    aspects.into_iter().take(cap).map(Signal::from).collect()
}

pub fn select_dimension(aspects: &[Aspect], dimension: &Dimension) -> Vec<Signal> {
    let matching = aspects
        .iter()
        .filter(|aspect| matches_any_pair(aspect, dimension.pairs))
        .collect();
    rank_by_weight(matching, dimension.cap)
}

pub fn select_by_type(
    aspects: &[Aspect],
    accept: impl Fn(AspectType) -> bool,
    cap: usize,
) -> Vec<Signal> {
    let matching = aspects
        .iter()
        .filter(|aspect| accept(aspect.aspect_type))
        .collect();
    rank_by_weight(matching, cap)
}

/// Trines, sextiles and conjunctions, strongest first.
pub fn select_sweet(aspects: &[Aspect], cap: usize) -> Vec<Signal> {
    select_by_type(aspects, AspectType::is_harmonious, cap)
}

/// Squares and oppositions, strongest first.
pub fn select_friction(aspects: &[Aspect], cap: usize) -> Vec<Signal> {
    select_by_type(aspects, AspectType::is_challenging, cap)
}

fn planet_rank(planet: &str) -> usize {
    OVERLAY_PLANET_PRIORITY
        .iter()
        .position(|p| *p == planet)
        .unwrap_or(UNRANKED)
}

fn house_rank(house: u8) -> usize {
    OVERLAY_HOUSE_PRIORITY
        .iter()
        .position(|h| *h == house)
        .unwrap_or(UNRANKED)
}

/// Order overlays by (planet priority, house priority) and cap.
pub fn rank_overlays(overlays: &[HouseOverlay], cap: usize) -> Vec<HouseOverlay> {
    let mut ranked: Vec<&HouseOverlay> = overlays.iter().collect();
    ranked.sort_by_key(|o| (planet_rank(&o.planet), house_rank(o.house)));
    ranked.into_iter().take(cap).cloned().collect()
}

pub fn select_overlays_in_houses(
    overlays: &[HouseOverlay],
    houses: &[u8],
    cap: usize,
) -> Vec<HouseOverlay> {
    let focused: Vec<HouseOverlay> = overlays
        .iter()
        .filter(|o| houses.contains(&o.house))
        .cloned()
        .collect();
    rank_overlays(&focused, cap)
}

/// Aspects touching the rule's planets, tightest orb first.
pub fn select_tight_aspects(aspects: &[Aspect], rule: &TightAspectRule) -> Vec<Signal> {
    let mut touching: Vec<&Aspect> = aspects
        .iter()
        .filter(|aspect| rule.planets.iter().any(|p| aspect.involves(p)))
        .collect();
    touching.sort_by(|a, b| a.orb.total_cmp(&b.orb));
    touching.into_iter().take(rule.cap).map(Signal::from).collect()
}

/// Apply a section table to a synastry computation.
pub fn select_section(table: &SectionTable, synastry: &SynastryData) -> SectionSignals {
    let aspects = &synastry.aspects;

    let dimensions = table
        .dimensions
        .iter()
        .map(|dimension| DimensionSignals {
            name: dimension.name.to_string(),
            signals: select_dimension(aspects, dimension),
        })
        .collect();

    let overlays = match table.focus_houses {
        Some(houses) => select_overlays_in_houses(&synastry.house_overlays, houses, table.overlay_cap),
        None => rank_overlays(&synastry.house_overlays, table.overlay_cap),
    };

    let tight_aspects = table
        .tight_aspects
        .as_ref()
        .map(|rule| select_tight_aspects(aspects, rule))
        .unwrap_or_default();

    SectionSignals {
        dimensions,
        sweet: select_sweet(aspects, table.sweet_cap),
        friction: select_friction(aspects, table.friction_cap),
        overlays,
        tight_aspects,
    }
}
