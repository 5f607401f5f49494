//! The replication message exchanged between cluster nodes.
//!
//! A [`LockEvent`] is shaped like a lock record keyed by
//! `(resource_type, resource_id)`. An acquire carries the owner fields; a
//! release carries the same key with the owner fields set to `null`.

use editlock_core::locking::{LockKey, LockRecord};
use editlock_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Whether an event announces a new holder or the end of a hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockEventKind {
    Acquire,
    Release,
}

/// An acquire or release announcement for one lock key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    pub resource_type: String,
    pub resource_id: String,
    /// `None` for a release.
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    /// Acquire time for an acquire, emission time for a release.
    pub timestamp: Timestamp,
}

impl LockEvent {
    /// Announce that `record` now holds its key.
    pub fn acquire(record: &LockRecord) -> Self {
        Self {
            resource_type: record.resource_type.clone(),
            resource_id: record.resource_id.clone(),
            owner_id: Some(record.owner_id.clone()),
            owner_name: Some(record.owner_name.clone()),
            timestamp: record.acquired_at,
        }
    }

    /// Announce that `key` is no longer held.
    pub fn release(key: &LockKey, timestamp: Timestamp) -> Self {
        Self {
            resource_type: key.resource_type.clone(),
            resource_id: key.resource_id.clone(),
            owner_id: None,
            owner_name: None,
            timestamp,
        }
    }

    pub fn kind(&self) -> LockEventKind {
        if self.owner_id.is_some() {
            LockEventKind::Acquire
        } else {
            LockEventKind::Release
        }
    }

    pub fn key(&self) -> LockKey {
        LockKey::new(&self.resource_type, &self.resource_id)
    }

    /// The record an acquire event describes, or `None` for a release.
    ///
    /// A missing display name falls back to the owner id.
    pub fn to_record(&self) -> Option<LockRecord> {
        let owner_id = self.owner_id.clone()?;
        let owner_name = self.owner_name.clone().unwrap_or_else(|| owner_id.clone());
        Some(LockRecord {
            owner_id,
            owner_name,
            resource_type: self.resource_type.clone(),
            resource_id: self.resource_id.clone(),
            acquired_at: self.timestamp,
        })
    }

    /// Encode as JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode from JSON bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
