//! # Quantum Chain - Producer Rotation (Subsystem 18)
//!
//! **Bounded Context:** Block Producer Scheduling
//! **Architecture Compliance:** DDD + Hexagonal + EDA + TDD
//!
//! ## Purpose
//!
//! Decides which producers sign blocks. The top `active_count` producers by
//! vote weight form the schedule, except that once per rotation period one
//! of them (`bp_out`) hands its slot to one of the next `standby_window`
//! producers (`sbp_in`). Both sides rotate round-robin through persisted
//! queues, so every standby producer periodically gets to produce.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - In-memory registry, state store, publisher, sink │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: RotationApi                             │
//! │  - Outbound: ProducerRegistry, RotationStateStore,  │
//! │    SchedulePublisher, RotationEventSink             │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain + Algorithms (Inner - Pure Logic)           │
//! │  - RankedProducerList, RotationState                │
//! │  - select_producers, rebuild_history                │
//! │  - compute_schedule                                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Schedule Size**: exactly `active_count` entries whenever enough
//!    producers are eligible
//! 2. **Pair Atomicity**: `bp_out` and `sbp_in` are set or cleared together
//! 3. **Pair Membership**: `bp_out` is active, `sbp_in` is in the standby window
//! 4. **History Consistency**: each queue holds exactly its current members
//! 5. **Tick Cadence**: the pair advances at most once per rotation period
//! 6. **Determinism**: same registry, state and time give the same schedule
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use qc_18_producer_rotation::adapters::*;
//! use qc_18_producer_rotation::{RotationApi, RotationConfig, RotationDependencies, RotationService};
//!
//! let service = RotationService::new(
//!     RotationDependencies {
//!         registry: Arc::new(InMemoryProducerRegistry::new()),
//!         store: Arc::new(InMemoryStateStore::new()),
//!         publisher: Arc::new(InMemorySchedulePublisher::new()),
//!         events: Arc::new(TracingEventSink),
//!     },
//!     RotationConfig::from_env()?,
//! )?;
//!
//! // On every block
//! if let Some(update) = service.on_block(block_time)? {
//!     println!("schedule v{:?}: {:?}", update.installed_version, update.schedule);
//! }
//! ```

#![warn(missing_docs)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export main types
pub use algorithms::{compute_rotation, compute_schedule, ClearReason, PairTransition};
pub use config::RotationConfig;
pub use domain::{
    FreshEntrantPolicy, ProducerInfo, ProducerKey, ProducerName, PublicKey, RankedProducerList,
    RotationPair, RotationState, Timestamp,
};
pub use error::{Result, RotationError};
pub use events::RotationEvent;
pub use ports::{
    ProducerRegistry, RotationApi, RotationEventSink, RotationStateStore, ScheduleUpdate,
    SchedulePublisher, TimeSource,
};
pub use service::{RotationDependencies, RotationService};

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 18;

/// Default size of the active producer set
pub const DEFAULT_ACTIVE_COUNT: usize = 21;

/// Default number of standby producers eligible for rotation-in
pub const DEFAULT_STANDBY_WINDOW: usize = 4;

/// Default rotation period (12 hours)
pub const DEFAULT_ROTATION_PERIOD_SECS: u64 = 12 * 60 * 60;

/// Default minimum interval between block-driven recalculations
pub const DEFAULT_SCHEDULE_UPDATE_INTERVAL_SECS: u64 = 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_id() {
        assert_eq!(SUBSYSTEM_ID, 18);
    }

    #[test]
    fn test_default_config_matches_constants() {
        let config = RotationConfig::default();
        assert_eq!(config.active_count, DEFAULT_ACTIVE_COUNT);
        assert_eq!(config.standby_window, DEFAULT_STANDBY_WINDOW);
        assert_eq!(config.rotation_period_secs, 43_200);
        assert!(config.validate().is_ok());
    }
}
