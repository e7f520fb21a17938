//! # Active Set / Standby Window Selection
//!
//! Walks the ranked registry once: the first `active_count` eligible
//! producers form the active set, the next `standby_window` eligible ones
//! form the standby window. The standby window is only filled when the
//! active set is full.

use crate::domain::{ProducerKey, ProducerName, RankedProducerList};

/// Result of one walk over the ranked registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Top-N producers in rank order.
    pub active: Vec<ProducerKey>,
    /// Standby producers in rank order.
    pub standby: Vec<ProducerKey>,
}

impl Selection {
    /// Whether the active set reached `active_count`.
    pub fn is_full(&self, active_count: usize) -> bool {
        self.active.len() == active_count
    }

    /// Whether `name` is in the active set.
    pub fn in_active(&self, name: &ProducerName) -> bool {
        self.active.iter().any(|k| &k.producer == name)
    }

    /// Whether `name` is in the standby window.
    pub fn in_standby(&self, name: &ProducerName) -> bool {
        self.standby.iter().any(|k| &k.producer == name)
    }

    /// Active set names in rank order.
    pub fn active_names(&self) -> Vec<ProducerName> {
        self.active.iter().map(|k| k.producer.clone()).collect()
    }

    /// Standby window names in rank order.
    pub fn standby_names(&self) -> Vec<ProducerName> {
        self.standby.iter().map(|k| k.producer.clone()).collect()
    }
}

/// Select the active set and the standby window.
pub fn select_producers(
    ranked: &RankedProducerList,
    active_count: usize,
    standby_window: usize,
) -> Selection {
    let mut eligible = ranked.eligible();

    let active: Vec<ProducerKey> = eligible
        .by_ref()
        .take(active_count)
        .map(|p| p.producer_key())
        .collect();

    let standby = if active.len() == active_count {
        eligible
            .take(standby_window)
            .map(|p| p.producer_key())
            .collect()
    } else {
        Vec::new()
    };

    Selection { active, standby }
}
