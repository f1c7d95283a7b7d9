use crate::chart::BirthInput;
use crate::error::Price;
use crate::scoring::RelationshipKind;
use crate::service::collaborators::{
    AccessCheck, EntitlementLedger, Entitlements, FeatureBalance, HashCheck, SYNASTRY_FEATURE,
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

/// Stable key for a pair of people and a relationship label.
///
/// The two birth identities are sorted first, so swapping A and B yields
/// the same hash.
pub fn synastry_pair_hash(
    person_a: &BirthInput,
    person_b: &BirthInput,
    relationship_type: RelationshipKind,
) -> String {
    let mut identities = [person_a.identity(), person_b.identity()];
    identities.sort();

    let mut hasher = Sha256::new();
    hasher.update(identities[0].as_bytes());
    hasher.update(b"\n");
    hasher.update(identities[1].as_bytes());
    hasher.update(b"\n");
    hasher.update(relationship_type.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub user_id: String,
    pub pair_hash: String,
    pub success: bool,
}

#[derive(Debug, Default)]
struct LedgerState {
    quotas: HashMap<String, u32>,
    paid_pairs: HashSet<(String, String)>,
    usage: Vec<UsageRecord>,
    consumed: u32,
}

/// Process-local ledger for the CLI and tests.
#[derive(Debug)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    price: Price,
}

impl InMemoryLedger {
    pub fn new(price: Price) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            price,
        }
    }

    pub async fn grant(&self, user_id: &str, units: u32) {
        let mut state = self.state.lock().await;
        *state.quotas.entry(user_id.to_string()).or_insert(0) += units;
    }

    pub async fn remaining(&self, user_id: &str) -> u32 {
        let state = self.state.lock().await;
        state.quotas.get(user_id).copied().unwrap_or(0)
    }

    pub async fn usage(&self) -> Vec<UsageRecord> {
        self.state.lock().await.usage.clone()
    }

    /// Total units consumed across all users.
    pub async fn consumed(&self) -> u32 {
        self.state.lock().await.consumed
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(Price {
            amount: 299,
            currency: "USD".to_string(),
        })
    }
}

#[async_trait]
impl EntitlementLedger for InMemoryLedger {
    async fn check_access(
        &self,
        user_id: &str,
        feature: &str,
        _device_fingerprint: Option<&str>,
    ) -> anyhow::Result<AccessCheck> {
        if feature != SYNASTRY_FEATURE {
            anyhow::bail!("Unknown feature: {feature}");
        }
        let left = self.remaining(user_id).await;
        let can_access = left > 0;
        Ok(AccessCheck {
            can_access,
            need_purchase: !can_access,
            price: (!can_access).then(|| self.price.clone()),
        })
    }

    async fn check_synastry_hash(
        &self,
        user_id: &str,
        person_a: &BirthInput,
        person_b: &BirthInput,
        relationship_type: RelationshipKind,
    ) -> anyhow::Result<HashCheck> {
        let key = (
            user_id.to_string(),
            synastry_pair_hash(person_a, person_b, relationship_type),
        );
        let state = self.state.lock().await;
        Ok(HashCheck {
            exists: state.paid_pairs.contains(&key),
        })
    }

    async fn get_entitlements(
        &self,
        user_id: &str,
        _device_fingerprint: Option<&str>,
    ) -> anyhow::Result<Entitlements> {
        Ok(Entitlements {
            synastry: FeatureBalance {
                total_left: self.remaining(user_id).await,
            },
        })
    }

    async fn record_synastry_usage(
        &self,
        user_id: &str,
        person_a: &BirthInput,
        person_b: &BirthInput,
        relationship_type: RelationshipKind,
        success: bool,
    ) -> anyhow::Result<()> {
        let pair_hash = synastry_pair_hash(person_a, person_b, relationship_type);
        let mut state = self.state.lock().await;
        if success {
            state
                .paid_pairs
                .insert((user_id.to_string(), pair_hash.clone()));
        }
        state.usage.push(UsageRecord {
            user_id: user_id.to_string(),
            pair_hash,
            success,
        });
        Ok(())
    }

    async fn consume_feature(
        &self,
        user_id: &str,
        feature: &str,
        _device_fingerprint: Option<&str>,
    ) -> anyhow::Result<bool> {
        if feature != SYNASTRY_FEATURE {
            anyhow::bail!("Unknown feature: {feature}");
        }
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        match state.quotas.get_mut(user_id) {
            Some(left) if *left > 0 => {
                *left -= 1;
                state.consumed += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
