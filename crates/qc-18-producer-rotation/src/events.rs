//! Published events (Outgoing)
//!
//! Emitted after a recalculation has been persisted. Consumers (telemetry,
//! explorers) observe rotation progress through these only.

use crate::algorithms::{ClearReason, PairTransition};
use crate::domain::{ProducerName, RotationPair, Timestamp};
use serde::{Deserialize, Serialize};

/// Rotation lifecycle event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationEvent {
    /// A rotation tick selected a new pair.
    PairAdvanced {
        /// New pair.
        pair: RotationPair,
        /// Tick time.
        at: Timestamp,
    },
    /// The pair was dropped.
    PairCleared {
        /// Dropped pair.
        pair: RotationPair,
        /// Why it was dropped.
        reason: ClearReason,
        /// Recalculation time.
        at: Timestamp,
    },
    /// The publisher installed a changed schedule.
    ScheduleInstalled {
        /// Version assigned by the publisher.
        version: u32,
        /// Installed producers, in installation order.
        producers: Vec<ProducerName>,
        /// Recalculation time.
        at: Timestamp,
    },
}

impl RotationEvent {
    /// Event for a pair transition, `None` when nothing changed.
    pub fn from_transition(transition: &PairTransition, at: Timestamp) -> Option<Self> {
        match transition {
            PairTransition::Unchanged => None,
            PairTransition::Advanced { current, .. } => Some(Self::PairAdvanced {
                pair: current.clone(),
                at,
            }),
            PairTransition::Cleared { previous, reason } => Some(Self::PairCleared {
                pair: previous.clone(),
                reason: *reason,
                at,
            }),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PairAdvanced { .. } => "pair_advanced",
            Self::PairCleared { .. } => "pair_cleared",
            Self::ScheduleInstalled { .. } => "schedule_installed",
        }
    }
}
