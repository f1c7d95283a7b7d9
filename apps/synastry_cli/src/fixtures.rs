//! Offline stand-ins for the chart and narrative services.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use synastry_core::chart::{BirthInput, NatalChart};
use synastry_core::scoring::RelationshipKind;
use synastry_core::service::{
    EphemerisService, NarrativeContent, NarrativeGenerator, NarrativeRequest, NarrativeResponse,
};
use synastry_core::{EphemerisError, NarrativeError};

#[derive(Debug, Clone, Deserialize)]
pub struct PersonFixture {
    pub birth: BirthInput,
    pub chart: NatalChart,
}

/// Input file: both people with their pre-computed charts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairFile {
    pub person_a: PersonFixture,
    pub person_b: PersonFixture,
    pub relationship_type: RelationshipKind,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_user() -> String {
    "cli".to_string()
}

pub fn load_pair_file(path: &Path) -> anyhow::Result<PairFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Serves charts from the pair file, keyed by birth identity.
pub struct FixtureEphemeris {
    charts: Vec<(String, NatalChart)>,
}

impl FixtureEphemeris {
    pub fn from_pair(pair: &PairFile) -> Self {
        Self {
            charts: vec![
                (pair.person_a.birth.identity(), pair.person_a.chart.clone()),
                (pair.person_b.birth.identity(), pair.person_b.chart.clone()),
            ],
        }
    }
}

#[async_trait]
impl EphemerisService for FixtureEphemeris {
    async fn calculate_natal_chart(&self, input: &BirthInput) -> Result<NatalChart, EphemerisError> {
        let identity = input.identity();
        match self.charts.iter().find(|(id, _)| *id == identity) {
            Some((_, chart)) => Ok(chart.clone()),
            None => {
                log::warn!("no fixture chart for {identity}");
                Err(EphemerisError::CalculationFailed {
                    city: input.city.clone(),
                    message: "no fixture chart for this birth input".to_string(),
                })
            }
        }
    }
}

/// Returns the assembled prompt context as the narrative body.
pub struct EchoGenerator;

#[async_trait]
impl NarrativeGenerator for EchoGenerator {
    async fn generate(&self, request: NarrativeRequest) -> Result<NarrativeResponse, NarrativeError> {
        let content = serde_json::to_string_pretty(&request.context)
            .map_err(|e| NarrativeError::Failed(e.to_string()))?;
        Ok(NarrativeResponse {
            content: NarrativeContent {
                content,
                lang: request.lang,
            },
            meta: serde_json::json!({
                "generator": "echo",
                "promptId": request.prompt_id,
            }),
        })
    }
}
