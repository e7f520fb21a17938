//! # Domain Entities
//!
//! Registry entries and the ranked snapshot the engine consumes.

use super::value_objects::{ProducerKey, ProducerName, PublicKey};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Registered producer as seen by the vote tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerInfo {
    /// Producer identity.
    pub name: ProducerName,
    /// Block signing key.
    pub signing_key: PublicKey,
    /// Accumulated vote weight.
    pub total_votes: u128,
    /// Registration status (false once unregistered / deactivated).
    pub active: bool,
}

impl ProducerInfo {
    /// Create an active producer entry.
    pub fn new(name: ProducerName, signing_key: PublicKey, total_votes: u128) -> Self {
        Self {
            name,
            signing_key,
            total_votes,
            active: true,
        }
    }

    /// Registered, active, and carrying positive vote weight.
    pub fn is_eligible(&self) -> bool {
        self.active && self.total_votes > 0
    }

    /// Schedule slot for this producer.
    pub fn producer_key(&self) -> ProducerKey {
        ProducerKey::new(self.name.clone(), self.signing_key)
    }
}

/// Deterministic ranking: active producers first, then descending vote
/// weight, then ascending producer name, then ascending signing key.
///
/// Total over distinct entries, so the result never depends on snapshot
/// order.
pub fn ranking_order(a: &ProducerInfo, b: &ProducerInfo) -> Ordering {
    b.active
        .cmp(&a.active)
        .then_with(|| b.total_votes.cmp(&a.total_votes))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.signing_key.as_bytes().cmp(b.signing_key.as_bytes()))
}

/// Registry snapshot ordered by [`ranking_order`].
///
/// Built fresh for every schedule computation; never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankedProducerList {
    producers: Vec<ProducerInfo>,
}

impl RankedProducerList {
    /// Rank an unordered registry snapshot.
    ///
    /// Entries sharing a name are collapsed to the best-ranked one.
    pub fn from_snapshot(mut producers: Vec<ProducerInfo>) -> Self {
        producers.sort_by(ranking_order);

        let mut seen = std::collections::HashSet::new();
        producers.retain(|p| seen.insert(p.name.clone()));

        Self { producers }
    }

    /// Number of registered producers in the snapshot.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// All producers in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &ProducerInfo> {
        self.producers.iter()
    }

    /// Producers in rank order up to the first ineligible one.
    pub fn eligible(&self) -> impl Iterator<Item = &ProducerInfo> {
        self.producers.iter().take_while(|p| p.is_eligible())
    }

    /// Look up a producer by name.
    pub fn get(&self, name: &ProducerName) -> Option<&ProducerInfo> {
        self.producers.iter().find(|p| &p.name == name)
    }
}
