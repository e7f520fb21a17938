//! # Rotation History Bookkeeping
//!
//! Both queues follow the same two rules:
//! - members that survive keep their relative order and their entry time,
//! - new members are appended in rank order, stamped with `now`.
//!
//! Non-members are dropped. Rebuilding is O(n·m) with n, m bounded by
//! `active_count + standby_window`.

use crate::domain::{HistoryEntry, ProducerKey, ProducerName, Timestamp};
use std::collections::VecDeque;

/// Rebuild a history queue against the current membership.
pub fn rebuild_history(
    previous: &VecDeque<HistoryEntry>,
    members: &[ProducerKey],
    now: Timestamp,
) -> VecDeque<HistoryEntry> {
    let mut history: VecDeque<HistoryEntry> = previous
        .iter()
        .filter(|entry| members.iter().any(|k| k.producer == entry.producer))
        .cloned()
        .collect();

    for member in members {
        if !history.iter().any(|entry| entry.producer == member.producer) {
            history.push_back(HistoryEntry::new(member.producer.clone(), now));
        }
    }

    history
}

/// Take the first entry accepted by `eligible`, move it to the back of the
/// queue and return its producer.
///
/// Returns `None` (queue untouched) when nothing is eligible.
pub fn take_to_back<F>(history: &mut VecDeque<HistoryEntry>, eligible: F) -> Option<ProducerName>
where
    F: Fn(&HistoryEntry) -> bool,
{
    let position = history.iter().position(eligible)?;
    let entry = history.remove(position)?;
    let producer = entry.producer.clone();
    history.push_back(entry);
    Some(producer)
}
