//! # Rotation Engine
//!
//! Computes the next producer schedule from the ranked registry and the
//! persisted rotation state, advancing or dropping the rotation pair as a
//! side effect.
//!
//! The engine is deterministic and total: identical `(ranked, state, now)`
//! always yield the identical schedule and resulting state, and no input
//! makes it fail. Inconsistencies (a referenced producer lost its rank or
//! vanished) are resolved by clearing the pair.
//!
//! ```text
//! ranked registry ──► select active/standby ──► rebuild histories
//!                                                      │
//!                 ┌──────── now ≥ last + period ? ─────┤
//!                 ▼ yes                                ▼ no
//!          advance pair (front → back)          drop pair if stale
//!                 └──────────────┬─────────────────────┘
//!                                ▼
//!                  substitute bp_out slot with sbp_in
//! ```

use super::history::{rebuild_history, take_to_back};
use super::selection::{select_producers, Selection};
use crate::domain::{ProducerKey, RankedProducerList, RotationPair, RotationState, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Why a rotation pair was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearReason {
    /// Fewer eligible producers than `active_count`.
    ActiveSetUnderfull,
    /// `bp_out` is no longer in the active set.
    ProducerLeftActiveSet,
    /// `sbp_in` is no longer in the standby window.
    StandbyLeftWindow,
    /// A rotation tick found no eligible pair.
    NoCandidates,
}

impl ClearReason {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveSetUnderfull => "active_set_underfull",
            Self::ProducerLeftActiveSet => "producer_left_active_set",
            Self::StandbyLeftWindow => "standby_left_window",
            Self::NoCandidates => "no_candidates",
        }
    }
}

/// What happened to the rotation pair during one engine run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PairTransition {
    /// Pair (or absence of one) carried over.
    Unchanged,
    /// A rotation tick selected a pair.
    Advanced {
        /// Pair before the tick.
        previous: Option<RotationPair>,
        /// Pair after the tick.
        current: RotationPair,
    },
    /// The pair was dropped.
    Cleared {
        /// Pair that was dropped.
        previous: RotationPair,
        /// Why it was dropped.
        reason: ClearReason,
    },
}

/// Full result of one engine run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationOutcome {
    /// Schedule to install, in registry rank order.
    pub schedule: Vec<ProducerKey>,
    /// Pair bookkeeping.
    pub transition: PairTransition,
    /// Active set and standby window this run worked from.
    pub selection: Selection,
    /// Whether this run was a rotation tick.
    pub ticked: bool,
}

/// Compute the next schedule.
///
/// Returns `active_count` entries, or fewer only when the registry cannot
/// supply enough eligible producers.
pub fn compute_schedule(
    ranked: &RankedProducerList,
    state: &mut RotationState,
    now: Timestamp,
) -> Vec<ProducerKey> {
    compute_rotation(ranked, state, now).schedule
}

/// Compute the next schedule and report the pair transition.
pub fn compute_rotation(
    ranked: &RankedProducerList,
    state: &mut RotationState,
    now: Timestamp,
) -> RotationOutcome {
    let previous = state.pair().cloned();
    let selection = select_producers(ranked, state.active_count(), state.standby_window());

    let rotation_history = rebuild_history(state.rotation_history(), &selection.active, now);
    let standby_history =
        rebuild_history(state.standby_rotation_history(), &selection.standby, now);
    state.replace_histories(rotation_history, standby_history);

    if !selection.is_full(state.active_count()) {
        let transition = match state.clear_pair() {
            Some(previous) => {
                warn!(
                    "[qc-18] Active set under-full ({}/{}), dropping rotation pair {}",
                    selection.active.len(),
                    state.active_count(),
                    previous
                );
                PairTransition::Cleared {
                    previous,
                    reason: ClearReason::ActiveSetUnderfull,
                }
            }
            None => PairTransition::Unchanged,
        };

        return RotationOutcome {
            schedule: selection.active.clone(),
            transition,
            selection,
            ticked: false,
        };
    }

    let ticked = now >= state.next_rotation_time();
    let transition = if ticked {
        advance_pair(state, previous, now)
    } else {
        drop_stale_pair(state, &selection)
    };

    let schedule = substitute(state, &selection);

    debug!(
        active = selection.active.len(),
        standby = selection.standby.len(),
        ticked,
        bp_out = ?state.bp_out(),
        sbp_in = ?state.sbp_in(),
        "[qc-18] Schedule computed"
    );

    RotationOutcome {
        schedule,
        transition,
        selection,
        ticked,
    }
}

/// Rotation tick: pick the next pair from the queue fronts.
fn advance_pair(
    state: &mut RotationState,
    previous: Option<RotationPair>,
    now: Timestamp,
) -> PairTransition {
    state.clear_pair();

    let last_rotation_time = state.last_rotation_time();
    let policy = state.fresh_entrant_policy();

    let (rotation_history, standby_history) = state.histories_mut();
    if rotation_history.is_empty() || standby_history.is_empty() {
        return match previous {
            Some(previous) => PairTransition::Cleared {
                previous,
                reason: ClearReason::NoCandidates,
            },
            None => PairTransition::Unchanged,
        };
    }

    let bp_out = take_to_back(rotation_history, |entry| {
        policy.allows_rotation_out(entry, last_rotation_time)
    });
    let pair = match bp_out {
        Some(bp_out) => take_to_back(standby_history, |_| true)
            .map(|sbp_in| RotationPair::new(bp_out, sbp_in)),
        None => None,
    };

    state.set_last_rotation_time(now);

    match pair {
        Some(current) => {
            info!(
                bp_out = %current.bp_out,
                sbp_in = %current.sbp_in,
                "[qc-18] Rotation pair advanced"
            );
            state.set_pair(current.clone());
            PairTransition::Advanced { previous, current }
        }
        None => {
            debug!("[qc-18] Rotation tick without eligible producers to rotate out");
            match previous {
                Some(previous) => PairTransition::Cleared {
                    previous,
                    reason: ClearReason::NoCandidates,
                },
                None => PairTransition::Unchanged,
            }
        }
    }
}

/// Between ticks: drop a pair whose members lost their slots.
fn drop_stale_pair(state: &mut RotationState, selection: &Selection) -> PairTransition {
    let reason = match state.pair() {
        None => return PairTransition::Unchanged,
        Some(pair) if !selection.in_active(&pair.bp_out) => ClearReason::ProducerLeftActiveSet,
        Some(pair) if !selection.in_standby(&pair.sbp_in) => ClearReason::StandbyLeftWindow,
        Some(_) => return PairTransition::Unchanged,
    };

    match state.clear_pair() {
        Some(previous) => {
            warn!(
                bp_out = %previous.bp_out,
                sbp_in = %previous.sbp_in,
                reason = reason.as_str(),
                "[qc-18] Dropping stale rotation pair"
            );
            PairTransition::Cleared { previous, reason }
        }
        None => PairTransition::Unchanged,
    }
}

/// Overwrite `bp_out`'s slot with `sbp_in`'s key.
fn substitute(state: &RotationState, selection: &Selection) -> Vec<ProducerKey> {
    let mut schedule = selection.active.clone();

    if let Some(pair) = state.pair() {
        let slot = schedule.iter().position(|k| k.producer == pair.bp_out);
        let replacement = selection.standby.iter().find(|k| k.producer == pair.sbp_in);

        if let (Some(slot), Some(replacement)) = (slot, replacement) {
            schedule[slot] = replacement.clone();
        }
    }

    schedule
}
