//! Request orchestration: entitlement gate, chart fetch, local compute,
//! narrative generation and quota settlement.

pub mod collaborators;
pub mod ledger;

pub use collaborators::{
    AccessCheck, EntitlementLedger, Entitlements, EphemerisService, FeatureBalance, HashCheck,
    NarrativeContent, NarrativeGenerator, NarrativeRequest, NarrativeResponse, SYNASTRY_FEATURE,
};
pub use ledger::{synastry_pair_hash, InMemoryLedger, UsageRecord};

use crate::bundle::AnalysisBundle;
use crate::chart::BirthInput;
use crate::error::SynastryError;
use crate::narrative::{build_section_context, ContextInputs, SectionKind, SynastryTab};
use crate::scoring::RelationshipKind;
use crate::synastry::SynastryData;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use synastry_config::SynastrySettings;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynastryRequest {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_fingerprint: Option<String>,
    pub person_a: BirthInput,
    pub person_b: BirthInput,
    pub relationship_type: RelationshipKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Milliseconds spent per phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub core_ms: u64,
    pub ai_ms: u64,
    pub total_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingMeta {
    /// The pair and relationship were paid for by an earlier request
    pub already_paid: bool,
    /// This request consumed a quota unit
    pub charged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub request_id: String,
    pub prompt_id: String,
    pub billing: BillingMeta,
    /// Passed through from the narrative generator untouched
    pub generator: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynastryResponse {
    pub tab: SynastryTab,
    pub synastry: SynastryData,
    pub lang: String,
    pub content: NarrativeContent,
    pub meta: ResponseMeta,
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynastryOverviewSectionResponse {
    pub section: SectionKind,
    pub lang: String,
    pub content: NarrativeContent,
    pub meta: ResponseMeta,
    pub timing: Timing,
}

/// Outcome of the entitlement check made before any expensive work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Authorization {
    AlreadyPaid,
    FirstRequest { remaining: u32 },
}

struct RunOutput {
    synastry: SynastryData,
    lang: String,
    content: NarrativeContent,
    meta: ResponseMeta,
    timing: Timing,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub struct SynastryService {
    ephemeris: Arc<dyn EphemerisService>,
    narrative: Arc<dyn NarrativeGenerator>,
    ledger: Arc<dyn EntitlementLedger>,
    settings: SynastrySettings,
}

impl SynastryService {
    pub fn new(
        ephemeris: Arc<dyn EphemerisService>,
        narrative: Arc<dyn NarrativeGenerator>,
        ledger: Arc<dyn EntitlementLedger>,
        settings: SynastrySettings,
    ) -> Self {
        Self {
            ephemeris,
            narrative,
            ledger,
            settings,
        }
    }

    pub fn settings(&self) -> &SynastrySettings {
        &self.settings
    }

    /// Full synastry data plus the narrative for one tab.
    pub async fn analyze_tab(
        &self,
        request: &SynastryRequest,
        tab: SynastryTab,
    ) -> Result<SynastryResponse, SynastryError> {
        let prompt_id = self.settings.tab_prompt_id(tab.as_str());
        let out = self.run(request, tab.context_section(), prompt_id).await?;
        Ok(SynastryResponse {
            tab,
            synastry: out.synastry,
            lang: out.lang,
            content: out.content,
            meta: out.meta,
            timing: out.timing,
        })
    }

    /// Narrative for one report section.
    pub async fn analyze_section(
        &self,
        request: &SynastryRequest,
        section: SectionKind,
    ) -> Result<SynastryOverviewSectionResponse, SynastryError> {
        let prompt_id = self.settings.section_prompt_id(section.as_str());
        let out = self.run(request, section, prompt_id).await?;
        Ok(SynastryOverviewSectionResponse {
            section,
            lang: out.lang,
            content: out.content,
            meta: out.meta,
            timing: out.timing,
        })
    }

    async fn run(
        &self,
        request: &SynastryRequest,
        section: SectionKind,
        prompt_id: String,
    ) -> Result<RunOutput, SynastryError> {
        let started = Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let lang = request
            .lang
            .clone()
            .unwrap_or_else(|| self.settings.default_lang.clone());

        let authorization = self.authorize(request, &request_id).await?;

        let (chart_a, chart_b) = tokio::try_join!(
            self.ephemeris.calculate_natal_chart(&request.person_a),
            self.ephemeris.calculate_natal_chart(&request.person_b),
        )?;

        let core_started = Instant::now();
        let mut bundle = AnalysisBundle::compute(&chart_a, &chart_b);
        if section.requires_composite() {
            bundle = bundle.with_composite(&chart_a, &chart_b, |positions| {
                self.ephemeris.calculate_aspects(positions)
            });
        }
        let suggestions = bundle.top_suggestions(self.settings.suggestion_limit);
        let context = build_section_context(&ContextInputs {
            section,
            relationship_type: request.relationship_type,
            chart_a: &chart_a,
            chart_b: &chart_b,
            synastry: &bundle.synastry,
            suggestions: &suggestions,
            composite: bundle.composite.as_ref(),
        });
        let context = serde_json::to_value(&context)
            .map_err(|e| SynastryError::Internal(format!("context serialization: {e}")))?;
        let core_ms = millis(core_started.elapsed());
        log::debug!(
            "[{request_id}] core compute for {section}: {} aspects, {} overlays in {core_ms}ms",
            bundle.synastry.aspects.len(),
            bundle.synastry.house_overlays.len()
        );

        let ai_started = Instant::now();
        let generated = self
            .narrative
            .generate(NarrativeRequest {
                prompt_id: prompt_id.clone(),
                context,
                lang: lang.clone(),
                max_tokens: self.settings.max_tokens,
            })
            .await;
        let ai_ms = millis(ai_started.elapsed());

        let generated = match generated {
            Ok(generated) => generated,
            Err(err) => {
                log::warn!("[{request_id}] narrative generation failed after {ai_ms}ms: {err}");
                self.settle(request, authorization, false, &request_id).await;
                return Err(err.into());
            }
        };
        let charged = self.settle(request, authorization, true, &request_id).await;

        let remaining = match authorization {
            Authorization::AlreadyPaid => None,
            Authorization::FirstRequest { remaining } => {
                Some(if charged { remaining.saturating_sub(1) } else { remaining })
            }
        };

        let timing = Timing {
            core_ms,
            ai_ms,
            total_ms: millis(started.elapsed()),
        };
        log::debug!(
            "[{request_id}] timing core={}ms ai={}ms total={}ms",
            timing.core_ms,
            timing.ai_ms,
            timing.total_ms
        );

        Ok(RunOutput {
            synastry: bundle.synastry,
            lang,
            content: generated.content,
            meta: ResponseMeta {
                request_id,
                prompt_id,
                billing: BillingMeta {
                    already_paid: authorization == Authorization::AlreadyPaid,
                    charged,
                    remaining,
                },
                generator: generated.meta,
            },
            timing,
        })
    }

    /// Decide, before any generation, whether this request is covered.
    async fn authorize(
        &self,
        request: &SynastryRequest,
        request_id: &str,
    ) -> Result<Authorization, SynastryError> {
        let fingerprint = request.device_fingerprint.as_deref();
        let paid = self
            .ledger
            .check_synastry_hash(
                &request.user_id,
                &request.person_a,
                &request.person_b,
                request.relationship_type,
            )
            .await
            .map_err(SynastryError::Ledger)?;
        if paid.exists {
            log::info!(
                "[{request_id}] {} pair already paid for user {}",
                request.relationship_type,
                request.user_id
            );
            return Ok(Authorization::AlreadyPaid);
        }

        let access = self
            .ledger
            .check_access(&request.user_id, SYNASTRY_FEATURE, fingerprint)
            .await
            .map_err(SynastryError::Ledger)?;
        if !access.can_access {
            log::info!("[{request_id}] access denied for user {}", request.user_id);
            return Err(SynastryError::AccessDenied {
                need_purchase: access.need_purchase,
                price: access.price,
            });
        }

        let entitlements = self
            .ledger
            .get_entitlements(&request.user_id, fingerprint)
            .await
            .map_err(SynastryError::Ledger)?;
        log::info!(
            "[{request_id}] first {} request for user {}, {} synastry units left",
            request.relationship_type,
            request.user_id,
            entitlements.synastry.total_left
        );
        Ok(Authorization::FirstRequest {
            remaining: entitlements.synastry.total_left,
        })
    }

    /// Record usage for first requests and consume quota only on success,
    /// and only once the usage is recorded. Returns whether a unit was
    /// consumed. Ledger failures here are logged rather than surfaced, since
    /// the narrative has already been produced.
    async fn settle(
        &self,
        request: &SynastryRequest,
        authorization: Authorization,
        success: bool,
        request_id: &str,
    ) -> bool {
        if authorization == Authorization::AlreadyPaid {
            return false;
        }

        if let Err(err) = self
            .ledger
            .record_synastry_usage(
                &request.user_id,
                &request.person_a,
                &request.person_b,
                request.relationship_type,
                success,
            )
            .await
        {
            // the pair stays unpaid, so a unit must not be consumed for it
            log::error!(
                "[{request_id}] failed to record synastry usage, skipping quota consumption: {err:#}"
            );
            return false;
        }

        if !success {
            return false;
        }

        match self
            .ledger
            .consume_feature(
                &request.user_id,
                SYNASTRY_FEATURE,
                request.device_fingerprint.as_deref(),
            )
            .await
        {
            Ok(true) => true,
            Ok(false) => {
                log::warn!(
                    "[{request_id}] quota consumption refused for user {}",
                    request.user_id
                );
                false
            }
            Err(err) => {
                log::error!("[{request_id}] quota consumption failed: {err:#}");
                false
            }
        }
    }
}
