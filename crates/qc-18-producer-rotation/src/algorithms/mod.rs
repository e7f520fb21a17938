//! # Algorithms
//!
//! Pure schedule computation: selection, history bookkeeping and the
//! rotation engine itself.

pub mod history;
pub mod rotation;
pub mod selection;

pub use history::{rebuild_history, take_to_back};
pub use rotation::{
    compute_rotation, compute_schedule, ClearReason, PairTransition, RotationOutcome,
};
pub use selection::{select_producers, Selection};
