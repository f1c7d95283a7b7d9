//! Structured prompt context handed to the narrative generator.

use crate::aspects::Aspect;
use crate::chart::{NatalChart, PlanetPosition};
use crate::narrative::sections::SectionKind;
use crate::scoring::{aspect_weight, RelationshipKind, RelationshipSuggestion, Signal};
use crate::signals::{select_section, SectionSignals};
use crate::synastry::SynastryData;
use serde::{Deserialize, Serialize};

/// Bodies summarized for each person in every context.
const SUMMARY_BODIES: [&str; 5] = ["Sun", "Moon", "Venus", "Mars", "Ascendant"];

pub type ContextBuilder = fn(&ContextInputs<'_>) -> SectionContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub sign: String,
    pub degree: u8,
    pub minute: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<u8>,
    #[serde(default)]
    pub is_retrograde: bool,
}

impl From<&PlanetPosition> for Placement {
    fn from(p: &PlanetPosition) -> Self {
        Placement {
            sign: p.sign.clone(),
            degree: p.degree,
            minute: p.minute,
            house: p.house,
            is_retrograde: p.is_retrograde,
        }
    }
}

/// A handful of named placements, not the full chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NatalSummary {
    pub sun: Option<Placement>,
    pub moon: Option<Placement>,
    pub venus: Option<Placement>,
    pub mars: Option<Placement>,
    pub ascendant: Option<Placement>,
}

pub fn summarize_positions(positions: &[PlanetPosition]) -> NatalSummary {
    let [sun, moon, venus, mars, ascendant] = SUMMARY_BODIES.map(|body| {
        positions
            .iter()
            .find(|p| p.name == body)
            .map(Placement::from)
    });
    NatalSummary {
        sun,
        moon,
        venus,
        mars,
        ascendant,
    }
}

pub fn summarize_chart(chart: &NatalChart) -> NatalSummary {
    summarize_positions(&chart.positions)
}

/// Composite chart plus its internal aspects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeView {
    pub positions: Vec<PlanetPosition>,
    pub aspects: Vec<Aspect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSummary {
    pub placements: NatalSummary,
    pub aspects: Vec<Signal>,
}

/// Everything a context builder may draw on.
pub struct ContextInputs<'a> {
    pub section: SectionKind,
    pub relationship_type: RelationshipKind,
    pub chart_a: &'a NatalChart,
    pub chart_b: &'a NatalChart,
    pub synastry: &'a SynastryData,
    /// Already truncated to the configured suggestion limit
    pub suggestions: &'a [RelationshipSuggestion],
    pub composite: Option<&'a CompositeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionContext {
    pub section: SectionKind,
    pub relationship_type: RelationshipKind,
    pub person_a: NatalSummary,
    pub person_b: NatalSummary,
    pub suggestions: Vec<RelationshipSuggestion>,
    #[serde(flatten)]
    pub signals: SectionSignals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_houses: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<CompositeSummary>,
}

/// Table-driven context: dimensions, sweet/friction buckets and overlays.
pub fn build_signal_context(inputs: &ContextInputs<'_>) -> SectionContext {
    SectionContext {
        section: inputs.section,
        relationship_type: inputs.relationship_type,
        person_a: summarize_chart(inputs.chart_a),
        person_b: summarize_chart(inputs.chart_b),
        suggestions: inputs.suggestions.to_vec(),
        signals: select_section(inputs.section.table(), inputs.synastry),
        focus_houses: None,
        composite: None,
    }
}

/// Signal context plus the focus houses the overlays were restricted to.
pub fn build_core_dynamics_context(inputs: &ContextInputs<'_>) -> SectionContext {
    let mut context = build_signal_context(inputs);
    context.focus_houses = inputs.section.table().focus_houses.map(|h| h.to_vec());
    context
}

/// Signal context plus composite placements and the composite's strongest
/// internal aspects. Without a composite chart the summary is omitted.
pub fn build_composite_context(inputs: &ContextInputs<'_>) -> SectionContext {
    let mut context = build_signal_context(inputs);
    let cap = inputs.section.table().composite_aspect_cap.unwrap_or(0);
    context.composite = inputs.composite.map(|view| {
        let mut ranked: Vec<&Aspect> = view.aspects.iter().collect();
        ranked.sort_by(|a, b| aspect_weight(b).total_cmp(&aspect_weight(a)));
        CompositeSummary {
            placements: summarize_positions(&view.positions),
            aspects: ranked.into_iter().take(cap).map(Signal::from).collect(),
        }
    });
    context
}

/// Dispatch to the section's builder.
pub fn build_section_context(inputs: &ContextInputs<'_>) -> SectionContext {
    let builder = inputs.section.builder();
    builder(inputs)
}
