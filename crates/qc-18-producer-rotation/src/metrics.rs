//! # Rotation Metrics
//!
//! Prometheus metrics for monitoring producer rotation.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-producer-rotation = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `rotation_schedules_computed_total` - Counter of schedule recalculations
//! - `rotation_pair_advances_total` - Counter of rotation ticks that selected a pair
//! - `rotation_pair_clears_total` - Counter of dropped pairs (by reason)
//! - `rotation_schedule_size` - Gauge of the last computed schedule length
//! - `rotation_schedule_version` - Gauge of the last installed schedule version

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total schedule recalculations
    pub static ref SCHEDULES_COMPUTED: IntCounter = register_int_counter!(
        "rotation_schedules_computed_total",
        "Total number of producer schedule recalculations"
    )
    .expect("Failed to create SCHEDULES_COMPUTED metric");

    /// Total rotation ticks that selected a pair
    pub static ref PAIR_ADVANCES: IntCounter = register_int_counter!(
        "rotation_pair_advances_total",
        "Total number of rotation pairs selected"
    )
    .expect("Failed to create PAIR_ADVANCES metric");

    /// Total dropped pairs, labeled by reason
    pub static ref PAIR_CLEARS: IntCounterVec = register_int_counter_vec!(
        "rotation_pair_clears_total",
        "Total number of rotation pairs dropped",
        &["reason"]
    )
    .expect("Failed to create PAIR_CLEARS metric");

    /// Length of the last computed schedule
    pub static ref SCHEDULE_SIZE: IntGauge = register_int_gauge!(
        "rotation_schedule_size",
        "Number of producers in the last computed schedule"
    )
    .expect("Failed to create SCHEDULE_SIZE metric");

    /// Last installed schedule version
    pub static ref SCHEDULE_VERSION: IntGauge = register_int_gauge!(
        "rotation_schedule_version",
        "Version of the last installed producer schedule"
    )
    .expect("Failed to create SCHEDULE_VERSION metric");
}

/// Record a schedule recalculation
#[cfg(feature = "metrics")]
pub fn record_schedule_computed(size: usize) {
    SCHEDULES_COMPUTED.inc();
    SCHEDULE_SIZE.set(size as i64);
}

/// Record a pair advance
#[cfg(feature = "metrics")]
pub fn record_pair_advanced() {
    PAIR_ADVANCES.inc();
}

/// Record a dropped pair with reason
#[cfg(feature = "metrics")]
pub fn record_pair_cleared(reason: &str) {
    PAIR_CLEARS.with_label_values(&[reason]).inc();
}

/// Record an installed schedule version
#[cfg(feature = "metrics")]
pub fn record_schedule_installed(version: u32) {
    SCHEDULE_VERSION.set(i64::from(version));
}

// No-op implementations when metrics feature is disabled

/// Record a schedule recalculation (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_schedule_computed(_size: usize) {}

/// Record a pair advance (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_pair_advanced() {}

/// Record a dropped pair (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_pair_cleared(_reason: &str) {}

/// Record an installed schedule version (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_schedule_installed(_version: u32) {}
