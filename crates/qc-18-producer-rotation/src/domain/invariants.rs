//! # Domain Invariants
//!
//! Rules that must hold for a rotation state after every engine run,
//! checked against the active set and standby window that run computed.

use super::rotation_state::RotationState;
use super::value_objects::{HistoryEntry, ProducerName};
use crate::error::{Result, RotationError};
use std::collections::{HashSet, VecDeque};

/// Invariant: a set pair references a current active producer and a
/// current standby producer.
pub fn invariant_pair_membership(
    state: &RotationState,
    active: &[ProducerName],
    standby: &[ProducerName],
) -> Result<()> {
    let Some(pair) = state.pair() else {
        return Ok(());
    };

    if !active.contains(&pair.bp_out) {
        return Err(RotationError::InvariantViolation(format!(
            "bp_out {} is not in the active set",
            pair.bp_out
        )));
    }

    if !standby.contains(&pair.sbp_in) {
        return Err(RotationError::InvariantViolation(format!(
            "sbp_in {} is not in the standby window",
            pair.sbp_in
        )));
    }

    Ok(())
}

/// Invariant: a history queue holds each member exactly once and nothing
/// else.
pub fn invariant_history_matches(
    label: &str,
    history: &VecDeque<HistoryEntry>,
    members: &[ProducerName],
) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in history {
        if !seen.insert(&entry.producer) {
            return Err(RotationError::InvariantViolation(format!(
                "{}: duplicate entry {}",
                label, entry.producer
            )));
        }
        if !members.contains(&entry.producer) {
            return Err(RotationError::InvariantViolation(format!(
                "{}: {} is no longer a member",
                label, entry.producer
            )));
        }
    }

    if seen.len() != members.len() {
        return Err(RotationError::InvariantViolation(format!(
            "{}: {} entries for {} members",
            label,
            seen.len(),
            members.len()
        )));
    }

    Ok(())
}

/// Validate every state invariant against one computed selection.
pub fn validate_rotation_state(
    state: &RotationState,
    active: &[ProducerName],
    standby: &[ProducerName],
) -> Result<()> {
    invariant_pair_membership(state, active, standby)?;
    invariant_history_matches("rotation_history", state.rotation_history(), active)?;
    invariant_history_matches(
        "standby_rotation_history",
        state.standby_rotation_history(),
        standby,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotationConfig;
    use crate::domain::RotationPair;

    fn names(list: &[&str]) -> Vec<ProducerName> {
        list.iter().map(|n| ProducerName::from(*n)).collect()
    }

    fn history(list: &[&str]) -> VecDeque<HistoryEntry> {
        list.iter()
            .map(|n| HistoryEntry::new((*n).into(), 0))
            .collect()
    }

    #[test]
    fn test_no_pair_is_always_valid() {
        let state = RotationState::genesis(&RotationConfig::default());
        assert!(invariant_pair_membership(&state, &[], &[]).is_ok());
    }

    #[test]
    fn test_pair_membership() {
        let mut state = RotationState::genesis(&RotationConfig::default());
        state.set_pair(RotationPair::new("prodq".into(), "runnerup1".into()));

        let active = names(&["proda", "prodq"]);
        let standby = names(&["runnerup1"]);
        assert!(invariant_pair_membership(&state, &active, &standby).is_ok());

        let active = names(&["proda"]);
        assert!(invariant_pair_membership(&state, &active, &standby).is_err());

        let active = names(&["proda", "prodq"]);
        assert!(invariant_pair_membership(&state, &active, &names(&["runnerup2"])).is_err());
    }

    #[test]
    fn test_history_matches() {
        let members = names(&["proda", "prodb"]);

        assert!(invariant_history_matches("h", &history(&["prodb", "proda"]), &members).is_ok());
        assert!(invariant_history_matches("h", &history(&["proda"]), &members).is_err());
        assert!(
            invariant_history_matches("h", &history(&["proda", "proda"]), &members).is_err()
        );
        assert!(
            invariant_history_matches("h", &history(&["proda", "prodb", "prodc"]), &members)
                .is_err()
        );
    }
}
