//! Aspect strength and relationship-archetype compatibility scores.

pub mod archetypes;

pub use archetypes::{Archetype, RelationshipKind, ARCHETYPES};

use crate::aspects::{Aspect, AspectType};
use crate::chart::round2;
use serde::{Deserialize, Serialize};

/// Orb at which the linear falloff would reach zero.
const ORB_FALLOFF_SPAN: f64 = 8.0;
/// Floor so a loose aspect still carries some signal.
const MIN_ORB_FACTOR: f64 = 0.2;

pub fn base_weight(aspect_type: AspectType) -> f64 {
    match aspect_type {
        AspectType::Conjunction => 1.0,
        AspectType::Trine => 0.9,
        AspectType::Sextile => 0.7,
        AspectType::Square => 0.55,
        AspectType::Opposition => 0.55,
    }
}

/// Strength of an aspect: base weight scaled by a floored linear orb decay.
pub fn aspect_weight(aspect: &Aspect) -> f64 {
    let falloff = (1.0 - aspect.orb / ORB_FALLOFF_SPAN).max(MIN_ORB_FACTOR);
    base_weight(aspect.aspect_type) * falloff
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSuggestion {
    pub key: RelationshipKind,
    pub score: u8,
}

/// Raw archetype score before normalization.
pub fn raw_archetype_score(archetype: &Archetype, aspects: &[Aspect]) -> f64 {
    aspects
        .iter()
        .filter(|aspect| archetype.matches(aspect))
        .map(|aspect| aspect_weight(aspect) * archetype.multiplier)
        .sum()
}

/// Score every archetype and normalize so the best reaches 100.
///
/// Results are sorted by descending score; equal scores keep archetype
/// table order. When nothing matches, every score is 0.
pub fn score_relationships(aspects: &[Aspect]) -> Vec<RelationshipSuggestion> {
    let raw: Vec<(RelationshipKind, f64)> = ARCHETYPES
        .iter()
        .map(|archetype| (archetype.key, raw_archetype_score(archetype, aspects)))
        .collect();

    let max = raw.iter().map(|(_, score)| *score).fold(0.0, f64::max);

    let mut suggestions: Vec<RelationshipSuggestion> = raw
        .into_iter()
        .map(|(key, score)| {
            let normalized = if max > 0.0 {
                (score / max * 100.0).round() as u8
            } else {
                0
            };
            RelationshipSuggestion {
                key,
                score: normalized,
            }
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions
}

/// Compact narrative record for one aspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub aspect: String,
    pub orb: f64,
    pub weight: f64,
}

impl From<&Aspect> for Signal {
    fn from(aspect: &Aspect) -> Self {
        Signal {
            aspect: aspect.label(),
            orb: aspect.orb,
            weight: round2(aspect_weight(aspect)),
        }
    }
}
