//! Configuration types for producer rotation

use crate::domain::FreshEntrantPolicy;
use crate::error::{Result, RotationError};
use serde::Deserialize;

/// Runtime configuration for producer rotation
///
/// The first three fields are the constants persisted with the rotation
/// state. They change only through the privileged admin action
/// (`RotationApi::update_config`).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RotationConfig {
    /// Size of the active (top-N) producer set
    pub active_count: usize,

    /// Number of standby producers eligible for rotation-in
    pub standby_window: usize,

    /// Seconds between forced rotation pair advances
    pub rotation_period_secs: u64,

    /// Whether freshly promoted producers may be rotated out right away
    pub fresh_entrant_policy: FreshEntrantPolicy,

    /// Minimum seconds between two schedule recalculations driven by
    /// `on_block` (0 = recalculate on every block)
    pub schedule_update_interval_secs: u64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            active_count: crate::DEFAULT_ACTIVE_COUNT,
            standby_window: crate::DEFAULT_STANDBY_WINDOW,
            rotation_period_secs: crate::DEFAULT_ROTATION_PERIOD_SECS,
            fresh_entrant_policy: FreshEntrantPolicy::Immediate,
            schedule_update_interval_secs: crate::DEFAULT_SCHEDULE_UPDATE_INTERVAL_SECS,
        }
    }
}

impl RotationConfig {
    /// Create config for testing: rotate on every recalculation.
    pub fn for_testing() -> Self {
        Self {
            active_count: 21,
            standby_window: 4,
            rotation_period_secs: 60,
            fresh_entrant_policy: FreshEntrantPolicy::Immediate,
            schedule_update_interval_secs: 0,
        }
    }

    /// Check the upstream invariants the rotation engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.active_count == 0 {
            return Err(RotationError::InvalidConfig(
                "active_count must be greater than zero".to_string(),
            ));
        }

        if self.rotation_period_secs == 0 {
            return Err(RotationError::InvalidConfig(
                "rotation_period_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Load from environment variables, falling back to defaults.
    ///
    /// Recognised keys: `QC_ROTATION_ACTIVE_COUNT`, `QC_ROTATION_STANDBY_WINDOW`,
    /// `QC_ROTATION_PERIOD_SECS`, `QC_ROTATION_FRESH_ENTRANT_POLICY`
    /// (`immediate` | `defer_one_period`), `QC_SCHEDULE_UPDATE_INTERVAL_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (environment, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("QC_ROTATION_ACTIVE_COUNT") {
            config.active_count = parse_number("QC_ROTATION_ACTIVE_COUNT", &val)?;
        }
        if let Some(val) = lookup("QC_ROTATION_STANDBY_WINDOW") {
            config.standby_window = parse_number("QC_ROTATION_STANDBY_WINDOW", &val)?;
        }
        if let Some(val) = lookup("QC_ROTATION_PERIOD_SECS") {
            config.rotation_period_secs = parse_number("QC_ROTATION_PERIOD_SECS", &val)?;
        }
        if let Some(val) = lookup("QC_ROTATION_FRESH_ENTRANT_POLICY") {
            config.fresh_entrant_policy = match val.to_lowercase().as_str() {
                "immediate" => FreshEntrantPolicy::Immediate,
                "defer_one_period" | "defer" => FreshEntrantPolicy::DeferOnePeriod,
                other => {
                    return Err(RotationError::InvalidConfig(format!(
                        "QC_ROTATION_FRESH_ENTRANT_POLICY: unknown policy '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(val) = lookup("QC_SCHEDULE_UPDATE_INTERVAL_SECS") {
            config.schedule_update_interval_secs =
                parse_number("QC_SCHEDULE_UPDATE_INTERVAL_SECS", &val)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, val: &str) -> Result<T> {
    val.trim()
        .parse()
        .map_err(|_| RotationError::InvalidConfig(format!("{}: '{}' is not a number", key, val)))
}
