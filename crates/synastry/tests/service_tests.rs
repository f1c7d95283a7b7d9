use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use synastry_config::SynastrySettings;
use synastry_core::aspects::{Aspect, AspectCalculator};
use synastry_core::chart::{position_at, BirthInput, NatalChart, PlanetPosition};
use synastry_core::narrative::{SectionKind, SynastryTab};
use synastry_core::scoring::RelationshipKind;
use synastry_core::service::{
    AccessCheck, EntitlementLedger, Entitlements, EphemerisService, HashCheck, InMemoryLedger,
    NarrativeContent, NarrativeGenerator, NarrativeRequest, NarrativeResponse,
};
use synastry_core::{EphemerisError, NarrativeError, SynastryError, SynastryRequest, SynastryService};

fn birth(city: &str, year: i32) -> BirthInput {
    BirthInput {
        date: NaiveDate::from_ymd_opt(year, 4, 12).unwrap(),
        time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        city: city.to_string(),
        lat: None,
        lon: None,
        timezone: "Europe/Berlin".to_string(),
        accuracy: Default::default(),
    }
}

fn chart(offset: f64) -> NatalChart {
    let bodies = [
        ("Sun", 10.0),
        ("Moon", 70.0),
        ("Mercury", 15.0),
        ("Venus", 40.0),
        ("Mars", 100.0),
        ("Saturn", 250.0),
        ("Ascendant", 0.0),
    ];
    NatalChart {
        positions: bodies
            .iter()
            .map(|(name, lon)| position_at(name, lon + offset, false))
            .collect(),
        dominance: None,
    }
}

struct StubEphemeris {
    fail_city: Option<String>,
    aspect_calls: AtomicUsize,
}

impl StubEphemeris {
    fn new() -> Self {
        Self {
            fail_city: None,
            aspect_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EphemerisService for StubEphemeris {
    async fn calculate_natal_chart(&self, input: &BirthInput) -> Result<NatalChart, EphemerisError> {
        if self.fail_city.as_deref() == Some(input.city.as_str()) {
            return Err(EphemerisError::CalculationFailed {
                city: input.city.clone(),
                message: "no coordinates".to_string(),
            });
        }
        Ok(if input.city == "Berlin" { chart(0.0) } else { chart(32.0) })
    }

    fn calculate_aspects(&self, positions: &[PlanetPosition]) -> Vec<Aspect> {
        self.aspect_calls.fetch_add(1, Ordering::SeqCst);
        AspectCalculator::new().compute_chart_aspects(positions)
    }
}

/// Records every request and optionally reports itself unavailable.
struct RecordingGenerator {
    unavailable: AtomicBool,
    requests: Mutex<Vec<NarrativeRequest>>,
}

impl RecordingGenerator {
    fn new() -> Self {
        Self {
            unavailable: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn last(&self) -> NarrativeRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl NarrativeGenerator for RecordingGenerator {
    async fn generate(&self, request: NarrativeRequest) -> Result<NarrativeResponse, NarrativeError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NarrativeError::Unavailable {
                reason: "model offline".to_string(),
            });
        }
        Ok(NarrativeResponse {
            content: NarrativeContent {
                content: format!("narrative for {}", request.prompt_id),
                lang: request.lang,
            },
            meta: serde_json::json!({ "model": "stub" }),
        })
    }
}

struct Harness {
    ephemeris: Arc<StubEphemeris>,
    generator: Arc<RecordingGenerator>,
    ledger: Arc<InMemoryLedger>,
    service: SynastryService,
}

async fn harness(units: u32, ephemeris: StubEphemeris) -> Harness {
    let ephemeris = Arc::new(ephemeris);
    let generator = Arc::new(RecordingGenerator::new());
    let ledger = Arc::new(InMemoryLedger::default());
    if units > 0 {
        ledger.grant("user-1", units).await;
    }
    let service = SynastryService::new(
        ephemeris.clone(),
        generator.clone(),
        ledger.clone(),
        SynastrySettings::default(),
    );
    Harness {
        ephemeris,
        generator,
        ledger,
        service,
    }
}

fn request() -> SynastryRequest {
    SynastryRequest {
        user_id: "user-1".to_string(),
        device_fingerprint: Some("device-9".to_string()),
        person_a: birth("Berlin", 1990),
        person_b: birth("Hamburg", 1992),
        relationship_type: RelationshipKind::Romantic,
        lang: None,
    }
}

#[tokio::test]
async fn test_first_request_consumes_one_unit() {
    let h = harness(2, StubEphemeris::new()).await;
    let response = h
        .service
        .analyze_section(&request(), SectionKind::Overview)
        .await
        .unwrap();

    assert_eq!(response.section, SectionKind::Overview);
    assert_eq!(response.lang, "en");
    assert_eq!(response.content.content, "narrative for synastry_overview");
    assert!(response.meta.billing.charged);
    assert!(!response.meta.billing.already_paid);
    assert_eq!(response.meta.billing.remaining, Some(1));
    assert_eq!(response.meta.generator["model"], "stub");
    assert!(uuid::Uuid::parse_str(&response.meta.request_id).is_ok());
    assert!(response.timing.total_ms >= response.timing.ai_ms);

    assert_eq!(h.ledger.remaining("user-1").await, 1);
    assert_eq!(h.ledger.consumed().await, 1);
}

#[tokio::test]
async fn test_repeat_request_is_not_charged_again() {
    let h = harness(1, StubEphemeris::new()).await;
    let req = request();
    h.service
        .analyze_section(&req, SectionKind::Overview)
        .await
        .unwrap();

    // Same pair in swapped order, different section: already paid
    let mut swapped = req.clone();
    std::mem::swap(&mut swapped.person_a, &mut swapped.person_b);
    let second = h
        .service
        .analyze_section(&swapped, SectionKind::Communication)
        .await
        .unwrap();

    assert!(second.meta.billing.already_paid);
    assert!(!second.meta.billing.charged);
    assert_eq!(second.meta.billing.remaining, None);
    assert_eq!(h.ledger.consumed().await, 1);
    assert_eq!(h.ledger.usage().await.len(), 1);
}

#[tokio::test]
async fn test_new_relationship_label_is_billed_separately() {
    let h = harness(1, StubEphemeris::new()).await;
    h.service
        .analyze_section(&request(), SectionKind::Overview)
        .await
        .unwrap();

    let mut friend = request();
    friend.relationship_type = RelationshipKind::Friend;
    let err = h
        .service
        .analyze_section(&friend, SectionKind::Overview)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_access_denied_without_quota() {
    let h = harness(0, StubEphemeris::new()).await;
    let err = h
        .service
        .analyze_tab(&request(), SynastryTab::Main)
        .await
        .unwrap_err();

    assert!(matches!(err, SynastryError::AccessDenied { need_purchase: true, .. }));
    assert_eq!(err.status_code(), 403);
    let body = serde_json::to_value(err.body()).unwrap();
    assert_eq!(body["needPurchase"], true);
    assert_eq!(body["price"]["amount"], 299);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn test_generator_unavailable_consumes_nothing() {
    let h = harness(1, StubEphemeris::new()).await;
    h.generator.unavailable.store(true, Ordering::SeqCst);
    let err = h
        .service
        .analyze_section(&request(), SectionKind::Conflict)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 503);
    assert_eq!(err.body().reason.as_deref(), Some("model offline"));
    assert_eq!(h.ledger.remaining("user-1").await, 1);
    assert_eq!(h.ledger.consumed().await, 0);

    let usage = h.ledger.usage().await;
    assert_eq!(usage.len(), 1);
    assert!(!usage[0].success);

    // The failed attempt did not mark the pair as paid
    h.generator.unavailable.store(false, Ordering::SeqCst);
    let retry = h
        .service
        .analyze_section(&request(), SectionKind::Conflict)
        .await
        .unwrap();
    assert!(retry.meta.billing.charged);
}

#[tokio::test]
async fn test_ephemeris_failure_is_internal_error() {
    let mut ephemeris = StubEphemeris::new();
    ephemeris.fail_city = Some("Hamburg".to_string());
    let h = harness(1, ephemeris).await;
    let err = h
        .service
        .analyze_section(&request(), SectionKind::Overview)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("Hamburg"));
    assert_eq!(h.generator.calls(), 0);
    assert_eq!(h.ledger.consumed().await, 0);
}

#[tokio::test]
async fn test_composite_only_for_composite_requests() {
    let h = harness(5, StubEphemeris::new()).await;

    h.service
        .analyze_section(&request(), SectionKind::Overview)
        .await
        .unwrap();
    assert_eq!(h.ephemeris.aspect_calls.load(Ordering::SeqCst), 0);
    assert!(h.generator.last().context.get("composite").is_none());

    h.service
        .analyze_section(&request(), SectionKind::Composite)
        .await
        .unwrap();
    assert_eq!(h.ephemeris.aspect_calls.load(Ordering::SeqCst), 1);
    assert!(h.generator.last().context["composite"].is_object());

    let tab = h
        .service
        .analyze_tab(&request(), SynastryTab::Composite)
        .await
        .unwrap();
    assert_eq!(h.ephemeris.aspect_calls.load(Ordering::SeqCst), 2);
    assert_eq!(tab.tab, SynastryTab::Composite);
    assert_eq!(h.generator.last().prompt_id, "synastry_tab_composite");
}

#[tokio::test]
async fn test_tab_response_carries_synastry_data() {
    let h = harness(1, StubEphemeris::new()).await;
    let mut req = request();
    req.lang = Some("de".to_string());
    let response = h.service.analyze_tab(&req, SynastryTab::Main).await.unwrap();

    assert_eq!(response.lang, "de");
    assert_eq!(response.content.lang, "de");
    assert!(!response.synastry.aspects.is_empty());
    assert!(!response.synastry.house_overlays.is_empty());

    let sent = h.generator.last();
    assert_eq!(sent.prompt_id, "synastry_tab_main");
    assert_eq!(sent.context["section"], "overview");
    assert_eq!(sent.context["relationshipType"], "romantic");
    assert!(sent.context["suggestions"].as_array().unwrap().len() <= 5);
}

/// Delegates to an in-memory ledger but can never record usage.
struct UnrecordableLedger {
    inner: InMemoryLedger,
}

#[async_trait]
impl EntitlementLedger for UnrecordableLedger {
    async fn check_access(
        &self,
        user_id: &str,
        feature: &str,
        device_fingerprint: Option<&str>,
    ) -> anyhow::Result<AccessCheck> {
        self.inner.check_access(user_id, feature, device_fingerprint).await
    }

    async fn check_synastry_hash(
        &self,
        user_id: &str,
        person_a: &BirthInput,
        person_b: &BirthInput,
        relationship_type: RelationshipKind,
    ) -> anyhow::Result<HashCheck> {
        self.inner
            .check_synastry_hash(user_id, person_a, person_b, relationship_type)
            .await
    }

    async fn get_entitlements(
        &self,
        user_id: &str,
        device_fingerprint: Option<&str>,
    ) -> anyhow::Result<Entitlements> {
        self.inner.get_entitlements(user_id, device_fingerprint).await
    }

    async fn record_synastry_usage(
        &self,
        _user_id: &str,
        _person_a: &BirthInput,
        _person_b: &BirthInput,
        _relationship_type: RelationshipKind,
        _success: bool,
    ) -> anyhow::Result<()> {
        anyhow::bail!("usage store offline")
    }

    async fn consume_feature(
        &self,
        user_id: &str,
        feature: &str,
        device_fingerprint: Option<&str>,
    ) -> anyhow::Result<bool> {
        self.inner.consume_feature(user_id, feature, device_fingerprint).await
    }
}

#[tokio::test]
async fn test_unrecorded_usage_never_consumes_quota() {
    let inner = InMemoryLedger::default();
    inner.grant("user-1", 2).await;
    let ledger = Arc::new(UnrecordableLedger { inner });
    let service = SynastryService::new(
        Arc::new(StubEphemeris::new()),
        Arc::new(RecordingGenerator::new()),
        ledger.clone(),
        SynastrySettings::default(),
    );

    let first = service
        .analyze_section(&request(), SectionKind::Overview)
        .await
        .unwrap();
    let second = service
        .analyze_section(&request(), SectionKind::Overview)
        .await
        .unwrap();

    assert!(!first.meta.billing.charged);
    assert!(!second.meta.billing.charged);
    assert_eq!(first.meta.billing.remaining, Some(2));
    assert_eq!(ledger.inner.consumed().await, 0);
    assert_eq!(ledger.inner.remaining("user-1").await, 2);
}
