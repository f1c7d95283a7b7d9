//! Contracts with the services this engine does not own.

use crate::aspects::{Aspect, AspectCalculator};
use crate::chart::{BirthInput, NatalChart, PlanetPosition};
use crate::error::{EphemerisError, NarrativeError, Price};
use crate::scoring::RelationshipKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Feature label used for every entitlement call.
pub const SYNASTRY_FEATURE: &str = "synastry";

#[async_trait]
pub trait EphemerisService: Send + Sync {
    async fn calculate_natal_chart(&self, input: &BirthInput) -> Result<NatalChart, EphemerisError>;

    /// Single-chart aspects. Defaults to the engine's own detector.
    fn calculate_aspects(&self, positions: &[PlanetPosition]) -> Vec<Aspect> {
        AspectCalculator::new().compute_chart_aspects(positions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    pub prompt_id: String,
    pub context: serde_json::Value,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeContent {
    pub content: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeResponse {
    pub content: NarrativeContent,
    #[serde(default)]
    pub meta: serde_json::Value,
}

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, request: NarrativeRequest) -> Result<NarrativeResponse, NarrativeError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheck {
    pub can_access: bool,
    pub need_purchase: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureBalance {
    pub total_left: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entitlements {
    pub synastry: FeatureBalance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCheck {
    pub exists: bool,
}

/// Account quotas, purchases and per-pair usage.
#[async_trait]
pub trait EntitlementLedger: Send + Sync {
    async fn check_access(
        &self,
        user_id: &str,
        feature: &str,
        device_fingerprint: Option<&str>,
    ) -> anyhow::Result<AccessCheck>;

    async fn check_synastry_hash(
        &self,
        user_id: &str,
        person_a: &BirthInput,
        person_b: &BirthInput,
        relationship_type: RelationshipKind,
    ) -> anyhow::Result<HashCheck>;

    async fn get_entitlements(
        &self,
        user_id: &str,
        device_fingerprint: Option<&str>,
    ) -> anyhow::Result<Entitlements>;

    async fn record_synastry_usage(
        &self,
        user_id: &str,
        person_a: &BirthInput,
        person_b: &BirthInput,
        relationship_type: RelationshipKind,
        success: bool,
    ) -> anyhow::Result<()>;

    async fn consume_feature(
        &self,
        user_id: &str,
        feature: &str,
        device_fingerprint: Option<&str>,
    ) -> anyhow::Result<bool>;
}
