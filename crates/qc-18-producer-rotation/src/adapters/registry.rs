//! In-memory producer registry
//!
//! Implements the ProducerRegistry port. Producers are never removed, only
//! deactivated, so a rotation state can always resolve historic names.

use crate::domain::{ProducerInfo, ProducerName, PublicKey};
use crate::error::{Result, RotationError};
use crate::ports::ProducerRegistry;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// In-memory producer registry / vote tally
pub struct InMemoryProducerRegistry {
    producers: RwLock<BTreeMap<ProducerName, ProducerInfo>>,
}

impl InMemoryProducerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            producers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a producer with zero votes.
    pub fn register_producer(&self, name: ProducerName, signing_key: PublicKey) -> Result<()> {
        let mut producers = self.producers.write();
        if producers.contains_key(&name) {
            return Err(RotationError::DuplicateProducer(name.to_string()));
        }

        debug!(producer = %name, "[qc-18] Producer registered");
        producers.insert(name.clone(), ProducerInfo::new(name, signing_key, 0));
        Ok(())
    }

    /// Replace the producer's accumulated vote weight.
    pub fn set_votes(&self, name: &ProducerName, total_votes: u128) -> Result<()> {
        self.with_producer(name, |p| p.total_votes = total_votes)
    }

    /// Activate or deactivate a producer.
    pub fn set_active(&self, name: &ProducerName, active: bool) -> Result<()> {
        self.with_producer(name, |p| p.active = active)
    }

    /// Rotate the producer's block signing key.
    pub fn set_signing_key(&self, name: &ProducerName, signing_key: PublicKey) -> Result<()> {
        self.with_producer(name, |p| p.signing_key = signing_key)
    }

    /// Look up a producer.
    pub fn get(&self, name: &ProducerName) -> Option<ProducerInfo> {
        self.producers.read().get(name).cloned()
    }

    /// Number of registered producers
    pub fn len(&self) -> usize {
        self.producers.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.producers.read().is_empty()
    }

    fn with_producer<F>(&self, name: &ProducerName, update: F) -> Result<()>
    where
        F: FnOnce(&mut ProducerInfo),
    {
        let mut producers = self.producers.write();
        let producer = producers
            .get_mut(name)
            .ok_or_else(|| RotationError::UnknownProducer(name.to_string()))?;
        update(producer);
        Ok(())
    }
}

impl Default for InMemoryProducerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProducerRegistry for InMemoryProducerRegistry {
    fn ranked_snapshot(&self) -> Result<Vec<ProducerInfo>> {
        Ok(self.producers.read().values().cloned().collect())
    }
}
