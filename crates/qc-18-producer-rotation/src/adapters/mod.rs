//! Adapters layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports, used by tests and by
//! hosts that keep rotation state in process.

mod event_sink;
mod registry;
mod schedule_publisher;
mod state_store;

pub use event_sink::*;
pub use registry::*;
pub use schedule_publisher::*;
pub use state_store::*;
