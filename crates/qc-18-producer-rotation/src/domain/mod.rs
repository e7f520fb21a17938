//! # Domain Module
//!
//! Core types for the producer rotation subsystem. Everything here is pure
//! (no I/O, no locking).
//!
//! - [`ProducerInfo`] / [`RankedProducerList`]: registry snapshot
//! - [`RotationState`]: the persisted rotation record
//! - invariants: state checks used by tests and auditors

pub mod entities;
pub mod invariants;
pub mod rotation_state;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use rotation_state::*;
pub use value_objects::*;
