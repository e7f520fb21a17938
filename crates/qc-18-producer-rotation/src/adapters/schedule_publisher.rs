//! In-memory schedule publisher
//!
//! Mirrors the host's proposed-schedule hook: the schedule is installed in
//! canonical (name-sorted) order and the version only moves when the
//! installed set changes.

use crate::domain::ProducerKey;
use crate::error::Result;
use crate::ports::SchedulePublisher;
use parking_lot::RwLock;
use tracing::{debug, info};

#[derive(Default)]
struct Installed {
    version: u32,
    schedule: Vec<ProducerKey>,
}

/// In-memory schedule publisher adapter
pub struct InMemorySchedulePublisher {
    installed: RwLock<Installed>,
}

impl InMemorySchedulePublisher {
    /// Create a publisher with nothing installed (version 0)
    pub fn new() -> Self {
        Self {
            installed: RwLock::new(Installed::default()),
        }
    }

    /// Current schedule version
    pub fn version(&self) -> u32 {
        self.installed.read().version
    }

    /// Currently installed schedule, name-sorted
    pub fn installed_schedule(&self) -> Vec<ProducerKey> {
        self.installed.read().schedule.clone()
    }
}

impl Default for InMemorySchedulePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulePublisher for InMemorySchedulePublisher {
    fn install_schedule(&self, schedule: &[ProducerKey]) -> Result<Option<u32>> {
        if schedule.is_empty() {
            debug!("[qc-18] Refusing to install an empty schedule");
            return Ok(None);
        }

        let mut canonical = schedule.to_vec();
        canonical.sort_by(|a, b| a.producer.cmp(&b.producer));

        let mut installed = self.installed.write();
        if installed.schedule == canonical {
            return Ok(None);
        }

        installed.version = installed.version.wrapping_add(1);
        installed.schedule = canonical;

        info!(
            version = installed.version,
            producers = installed.schedule.len(),
            "[qc-18] Producer schedule installed"
        );
        Ok(Some(installed.version))
    }
}
