use crate::aspects::{Aspect, AspectCalculator};
use crate::chart::{NatalChart, PlanetPosition};
use crate::narrative::CompositeView;
use crate::scoring::{score_relationships, RelationshipSuggestion};
use crate::synastry::{build_composite, compute_synastry, SynastryData};
use serde::Serialize;

/// All locally computed data for one pair of charts.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisBundle {
    pub synastry: SynastryData,
    /// Every archetype, best first
    pub suggestions: Vec<RelationshipSuggestion>,
    pub composite: Option<CompositeView>,
}

impl AnalysisBundle {
    pub fn compute(chart_a: &NatalChart, chart_b: &NatalChart) -> Self {
        let synastry = compute_synastry(chart_a, chart_b);
        let suggestions = score_relationships(&synastry.aspects);
        Self {
            synastry,
            suggestions,
            composite: None,
        }
    }

    /// Attach the composite chart, with its internal aspects found by `detect`.
    pub fn with_composite<F>(mut self, chart_a: &NatalChart, chart_b: &NatalChart, detect: F) -> Self
    where
        F: Fn(&[PlanetPosition]) -> Vec<Aspect>,
    {
        let positions = build_composite(&chart_a.positions, &chart_b.positions);
        let aspects = detect(&positions);
        self.composite = Some(CompositeView { positions, aspects });
        self
    }

    /// [`with_composite`](Self::with_composite) using the engine's own detector.
    pub fn with_default_composite(self, chart_a: &NatalChart, chart_b: &NatalChart) -> Self {
        let calculator = AspectCalculator::new();
        self.with_composite(chart_a, chart_b, |positions| {
            calculator.compute_chart_aspects(positions)
        })
    }

    pub fn top_suggestions(&self, limit: usize) -> Vec<RelationshipSuggestion> {
        self.suggestions.iter().take(limit).cloned().collect()
    }
}

/// Serializable view of a bundle for offline inspection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleReport<'a> {
    pub synastry: &'a SynastryData,
    pub suggestions: &'a [RelationshipSuggestion],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite: Option<&'a [PlanetPosition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_aspects: Option<&'a [Aspect]>,
}

impl AnalysisBundle {
    pub fn report(&self) -> BundleReport<'_> {
        BundleReport {
            synastry: &self.synastry,
            suggestions: &self.suggestions,
            composite: self.composite.as_ref().map(|c| c.positions.as_slice()),
            composite_aspects: self.composite.as_ref().map(|c| c.aspects.as_slice()),
        }
    }
}
