//! Driven ports (Outbound dependencies)
//!
//! All ports are synchronous: a schedule computation runs to completion
//! inside one block and never yields.

use crate::domain::{ProducerInfo, ProducerKey, RotationState, Timestamp};
use crate::error::Result;
use crate::events::RotationEvent;

/// Producer registry / vote tally.
pub trait ProducerRegistry: Send + Sync {
    /// Snapshot of every registered producer, in any order.
    ///
    /// The rotation engine ranks it itself.
    fn ranked_snapshot(&self) -> Result<Vec<ProducerInfo>>;
}

/// Persistence for the singleton rotation state.
pub trait RotationStateStore: Send + Sync {
    /// Load the persisted state, `None` before genesis.
    fn load(&self) -> Result<Option<RotationState>>;

    /// Persist the state, replacing any previous row.
    fn save(&self, state: &RotationState) -> Result<()>;
}

/// Host hook that installs a producer schedule.
pub trait SchedulePublisher: Send + Sync {
    /// Propose `schedule` for installation.
    ///
    /// Returns the new schedule version when the installed schedule changed,
    /// `None` when it was identical or not installable.
    fn install_schedule(&self, schedule: &[ProducerKey]) -> Result<Option<u32>>;
}

/// Sink for rotation events.
pub trait RotationEventSink: Send + Sync {
    /// Publish one event. Delivery failures must not abort a rotation.
    fn publish(&self, event: RotationEvent);
}

/// Time source for rotation ticks
pub trait TimeSource: Send + Sync {
    /// Get current unix timestamp in seconds
    fn now(&self) -> Timestamp;
}

/// Default time source using system time
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source_is_past_2023() {
        assert!(SystemTimeSource.now() > 1_672_531_200);
    }
}
