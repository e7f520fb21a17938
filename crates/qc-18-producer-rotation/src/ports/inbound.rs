//! Driving ports (Inbound API)

use crate::config::RotationConfig;
use crate::domain::{ProducerKey, RotationPair, RotationState, Timestamp};
use crate::error::Result;

/// Result of one schedule recalculation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleUpdate {
    /// Computed schedule in registry rank order.
    pub schedule: Vec<ProducerKey>,
    /// Rotation pair after the run.
    pub pair: Option<RotationPair>,
    /// Version assigned by the publisher, `None` if nothing was installed.
    pub installed_version: Option<u32>,
}

/// Primary Producer Rotation API
pub trait RotationApi: Send + Sync {
    /// Recompute the schedule at `now`, persist the state and hand the
    /// schedule to the publisher.
    fn recalculate_at(&self, now: Timestamp) -> Result<ScheduleUpdate>;

    /// Block hook: recalculate if `schedule_update_interval_secs` elapsed
    /// since the previous recalculation. Returns `None` when skipped.
    fn on_block(&self, now: Timestamp) -> Result<Option<ScheduleUpdate>>;

    /// Current rotation pair.
    fn current_pair(&self) -> Option<RotationPair>;

    /// Copy of the persisted rotation state.
    fn state_snapshot(&self) -> RotationState;

    /// Admin action: replace the rotation constants.
    fn update_config(&self, config: RotationConfig) -> Result<()>;
}
