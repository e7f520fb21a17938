//! In-memory rotation state store
//!
//! Keeps the singleton row in its encoded form so every load goes through
//! the same decoding path a persistent backend would.

use crate::domain::RotationState;
use crate::error::Result;
use crate::ports::RotationStateStore;
use parking_lot::RwLock;

/// In-memory rotation state store adapter for testing
pub struct InMemoryStateStore {
    row: RwLock<Option<Vec<u8>>>,
}

impl InMemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            row: RwLock::new(None),
        }
    }

    /// Create a store pre-seeded with an encoded row
    pub fn with_row(bytes: Vec<u8>) -> Self {
        Self {
            row: RwLock::new(Some(bytes)),
        }
    }

    /// Raw persisted row
    pub fn row(&self) -> Option<Vec<u8>> {
        self.row.read().clone()
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationStateStore for InMemoryStateStore {
    fn load(&self) -> Result<Option<RotationState>> {
        self.row
            .read()
            .as_deref()
            .map(RotationState::from_bytes)
            .transpose()
    }

    fn save(&self, state: &RotationState) -> Result<()> {
        let bytes = state.to_bytes()?;
        *self.row.write() = Some(bytes);
        Ok(())
    }
}
