//! # Rotation State
//!
//! The persisted singleton record of rotation progress. Outside this crate
//! it is read-only: the pair and the histories are mutated exclusively by
//! the rotation engine, and the constants only by the admin action.

use super::value_objects::{
    FreshEntrantPolicy, HistoryEntry, ProducerName, RotationPair, Timestamp,
};
use crate::config::RotationConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Persisted rotation record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    active_count: usize,
    standby_window: usize,
    rotation_period: u64,
    fresh_entrant_policy: FreshEntrantPolicy,
    last_rotation_time: Timestamp,
    pair: Option<RotationPair>,
    /// Active producers, oldest-eligible-to-rotate-out first.
    rotation_history: VecDeque<HistoryEntry>,
    /// Standby producers, oldest-eligible-to-rotate-in first.
    standby_rotation_history: VecDeque<HistoryEntry>,
}

impl RotationState {
    /// Genesis state: empty histories, no pair, clock at zero.
    pub fn genesis(config: &RotationConfig) -> Self {
        Self {
            active_count: config.active_count,
            standby_window: config.standby_window,
            rotation_period: config.rotation_period_secs,
            fresh_entrant_policy: config.fresh_entrant_policy,
            last_rotation_time: 0,
            pair: None,
            rotation_history: VecDeque::new(),
            standby_rotation_history: VecDeque::new(),
        }
    }

    /// Size of the active set (N).
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Number of standby slots eligible for rotation-in (M).
    pub fn standby_window(&self) -> usize {
        self.standby_window
    }

    /// Seconds between forced pair advances.
    pub fn rotation_period(&self) -> u64 {
        self.rotation_period
    }

    /// Fresh-entrant policy in force.
    pub fn fresh_entrant_policy(&self) -> FreshEntrantPolicy {
        self.fresh_entrant_policy
    }

    /// Time of the most recent rotation tick.
    pub fn last_rotation_time(&self) -> Timestamp {
        self.last_rotation_time
    }

    /// Earliest time at which the next tick may happen.
    pub fn next_rotation_time(&self) -> Timestamp {
        self.last_rotation_time.saturating_add(self.rotation_period)
    }

    /// Current rotation pair, if any.
    pub fn pair(&self) -> Option<&RotationPair> {
        self.pair.as_ref()
    }

    /// Producer currently rotated out.
    pub fn bp_out(&self) -> Option<&ProducerName> {
        self.pair.as_ref().map(|p| &p.bp_out)
    }

    /// Standby producer currently rotated in.
    pub fn sbp_in(&self) -> Option<&ProducerName> {
        self.pair.as_ref().map(|p| &p.sbp_in)
    }

    /// Rotation-out queue, front first.
    pub fn rotation_history(&self) -> &VecDeque<HistoryEntry> {
        &self.rotation_history
    }

    /// Rotation-in queue, front first.
    pub fn standby_rotation_history(&self) -> &VecDeque<HistoryEntry> {
        &self.standby_rotation_history
    }

    /// Producer names of the rotation-out queue, front first.
    pub fn rotation_order(&self) -> Vec<ProducerName> {
        self.rotation_history
            .iter()
            .map(|e| e.producer.clone())
            .collect()
    }

    /// Producer names of the rotation-in queue, front first.
    pub fn standby_rotation_order(&self) -> Vec<ProducerName> {
        self.standby_rotation_history
            .iter()
            .map(|e| e.producer.clone())
            .collect()
    }

    /// Encode as the persisted row.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a persisted row.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    // === ENGINE / ADMIN MUTATORS ===

    pub(crate) fn set_pair(&mut self, pair: RotationPair) {
        self.pair = Some(pair);
    }

    pub(crate) fn clear_pair(&mut self) -> Option<RotationPair> {
        self.pair.take()
    }

    pub(crate) fn set_last_rotation_time(&mut self, time: Timestamp) {
        self.last_rotation_time = time;
    }

    pub(crate) fn replace_histories(
        &mut self,
        rotation_history: VecDeque<HistoryEntry>,
        standby_rotation_history: VecDeque<HistoryEntry>,
    ) {
        self.rotation_history = rotation_history;
        self.standby_rotation_history = standby_rotation_history;
    }

    pub(crate) fn histories_mut(
        &mut self,
    ) -> (&mut VecDeque<HistoryEntry>, &mut VecDeque<HistoryEntry>) {
        (
            &mut self.rotation_history,
            &mut self.standby_rotation_history,
        )
    }

    /// Apply new constants. Histories and pair are kept; the next engine
    /// run reconciles them with the new sizes.
    pub(crate) fn apply_config(&mut self, config: &RotationConfig) {
        self.active_count = config.active_count;
        self.standby_window = config.standby_window;
        self.rotation_period = config.rotation_period_secs;
        self.fresh_entrant_policy = config.fresh_entrant_policy;
    }
}
