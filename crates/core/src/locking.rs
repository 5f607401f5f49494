//! Lock identity, holder records, per-type policies and validation.
//!
//! Everything here is a plain value type. The mutable lock table and the
//! merge rules live in `editlock-coordinator`; the replication wire message
//! lives in `editlock-events`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How often the expiration sweep runs by default (in seconds).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Schema version written into exported state snapshots.
pub const STATE_FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// LockKey
// ---------------------------------------------------------------------------

/// Identity of a lockable resource: `(resource_type, resource_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LockKey {
    pub resource_type: String,
    pub resource_id: String,
}

impl LockKey {
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}

// ---------------------------------------------------------------------------
// LockOwner
// ---------------------------------------------------------------------------

/// The user on whose behalf a lock is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOwner {
    /// Opaque user identifier.
    pub id: String,
    /// Human-readable name, informational only.
    pub display_name: String,
}

impl LockOwner {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LockRecord
// ---------------------------------------------------------------------------

/// The current holder of a lock.
///
/// `acquired_at` is the only field that takes part in cluster conflict
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub owner_id: String,
    pub owner_name: String,
    pub resource_type: String,
    pub resource_id: String,
    pub acquired_at: Timestamp,
}

impl LockRecord {
    /// Stamp a new record for `owner` on `key` at `acquired_at`.
    pub fn new(key: &LockKey, owner: &LockOwner, acquired_at: Timestamp) -> Self {
        Self {
            owner_id: owner.id.clone(),
            owner_name: owner.display_name.clone(),
            resource_type: key.resource_type.clone(),
            resource_id: key.resource_id.clone(),
            acquired_at,
        }
    }

    pub fn key(&self) -> LockKey {
        LockKey::new(&self.resource_type, &self.resource_id)
    }

    pub fn owner(&self) -> LockOwner {
        LockOwner::new(&self.owner_id, &self.owner_name)
    }
}

// ---------------------------------------------------------------------------
// LockDescriptor
// ---------------------------------------------------------------------------

/// Locking policy for one resource type.
///
/// A resource type is lockable only when a descriptor with its name is
/// registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockDescriptor {
    pub name: String,
    /// Seconds after which a lock is evicted by the sweep. `None` or `0`
    /// means the lock never expires.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl LockDescriptor {
    pub fn new(name: impl Into<String>, timeout_secs: Option<u64>) -> Self {
        Self {
            name: name.into(),
            timeout_secs,
        }
    }

    /// The positive timeout, if any.
    pub fn expires(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

// ---------------------------------------------------------------------------
// LockInfo
// ---------------------------------------------------------------------------

/// What a caller learns about a lock it does not (newly) hold.
///
/// Wrapped in `Option` by the coordinator: `None` from `lock()` means the
/// caller now holds the lock, `None` from `lock_info()` means unlocked.
/// `NotSupported` is a return value only and is never stored in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LockInfo {
    /// The resource is held by someone.
    Locked(LockRecord),
    /// The resource type has no lock policy; locking is not enforced.
    NotSupported,
}

impl LockInfo {
    pub fn is_not_supported(&self) -> bool {
        matches!(self, LockInfo::NotSupported)
    }

    pub fn record(&self) -> Option<&LockRecord> {
        match self {
            LockInfo::Locked(record) => Some(record),
            LockInfo::NotSupported => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate a `(resource_type, resource_id)` pair. Returns `Ok(())` or an
/// error message.
pub fn validate_lock_key(resource_type: &str, resource_id: &str) -> Result<(), String> {
    if resource_type.trim().is_empty() {
        return Err("resource_type must not be empty".to_string());
    }
    if resource_id.trim().is_empty() {
        return Err("resource_id must not be empty".to_string());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
