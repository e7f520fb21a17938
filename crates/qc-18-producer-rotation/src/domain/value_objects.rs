//! # Domain Value Objects
//!
//! Immutable value types shared by the registry, the rotation state and the
//! engine.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

/// Chain time in unix seconds, supplied by the host.
pub type Timestamp = u64;

/// Producer account identity.
///
/// Ordering is lexicographic on the account name and is the tie-breaker
/// used whenever two producers have equal vote weight.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProducerName(String);

impl ProducerName {
    /// Create a producer name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the account name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProducerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProducerName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Compressed secp256k1 block signing key (33 bytes).
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(#[serde_as(as = "Bytes")] [u8; 33]);

impl PublicKey {
    /// Wrap raw compressed key bytes.
    pub fn from_bytes(bytes: [u8; 33]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// One slot of a producer schedule: who produces and with which key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProducerKey {
    /// Producer identity.
    pub producer: ProducerName,
    /// Block signing key.
    pub signing_key: PublicKey,
}

impl ProducerKey {
    /// Create a schedule slot.
    pub fn new(producer: ProducerName, signing_key: PublicKey) -> Self {
        Self {
            producer,
            signing_key,
        }
    }
}

/// The currently active substitution.
///
/// Both halves live in one value, so `bp_out` and `sbp_in` are always set
/// or cleared together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPair {
    /// Active producer rotated out of the schedule.
    pub bp_out: ProducerName,
    /// Standby producer rotated into the freed slot.
    pub sbp_in: ProducerName,
}

impl RotationPair {
    /// Create a rotation pair.
    pub fn new(bp_out: ProducerName, sbp_in: ProducerName) -> Self {
        Self { bp_out, sbp_in }
    }
}

impl fmt::Display for RotationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.bp_out, self.sbp_in)
    }
}

/// Policy for producers that only just entered the active set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshEntrantPolicy {
    /// Queue position alone decides; a new entrant rotates out once it
    /// reaches the front.
    #[default]
    Immediate,
    /// A producer that entered the active set after the previous rotation
    /// tick is skipped when choosing `bp_out` until the next tick.
    DeferOnePeriod,
}

impl FreshEntrantPolicy {
    /// Whether `entry` may be rotated out at a tick following
    /// `last_rotation_time`.
    pub fn allows_rotation_out(&self, entry: &HistoryEntry, last_rotation_time: Timestamp) -> bool {
        match self {
            Self::Immediate => true,
            Self::DeferOnePeriod => entry.since <= last_rotation_time,
        }
    }
}

/// Element of a rotation history queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Producer identity.
    pub producer: ProducerName,
    /// When the producer entered this queue.
    pub since: Timestamp,
}

impl HistoryEntry {
    /// Create a history entry.
    pub fn new(producer: ProducerName, since: Timestamp) -> Self {
        Self { producer, since }
    }
}
