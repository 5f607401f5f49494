//! The local lock table and its merge rule.
//!
//! Every mutation goes through a per-key `DashMap` entry operation, so a
//! local acquire and a concurrently applied remote acquire for the same key
//! can never both believe they inserted.
//!
//! Merge rule for replicated events:
//!
//! - acquire: overwrite iff there is no local entry or the local entry was
//!   acquired strictly earlier. Equal timestamps keep the local entry. The
//!   rule is commutative and idempotent for acquires.
//! - release: remove unconditionally, whatever the timestamps. A late
//!   release can therefore erase a newer acquire taken elsewhere; this
//!   asymmetry is kept deliberately.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use editlock_core::locking::{LockKey, LockRecord};

/// Result of merging a replicated acquire into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No local entry existed; the incoming record was stored.
    Inserted,
    /// The local entry was older and has been overwritten.
    Replaced,
    /// The local entry was as new or newer and was kept.
    Kept,
}

impl MergeOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, MergeOutcome::Kept)
    }
}

/// Concurrent map from [`LockKey`] to the current holder.
#[derive(Debug, Default)]
pub struct LockTable {
    entries: DashMap<LockKey, LockRecord>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Local path
    // -----------------------------------------------------------------------

    /// Insert `record` if its key is free.
    ///
    /// Returns `None` on success, or the existing holder (untouched) on
    /// conflict.
    pub fn try_acquire(&self, record: LockRecord) -> Option<LockRecord> {
        match self.entries.entry(record.key()) {
            Entry::Occupied(existing) => Some(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(record);
                None
            }
        }
    }

    /// Remove the entry for `key`, returning it if there was one.
    pub fn release(&self, key: &LockKey) -> Option<LockRecord> {
        self.entries.remove(key).map(|(_, record)| record)
    }

    // -----------------------------------------------------------------------
    // Remote path
    // -----------------------------------------------------------------------

    /// Merge a replicated acquire.
    pub fn merge_acquire(&self, record: LockRecord) -> MergeOutcome {
        match self.entries.entry(record.key()) {
            Entry::Occupied(mut existing) => {
                if existing.get().acquired_at < record.acquired_at {
                    existing.insert(record);
                    MergeOutcome::Replaced
                } else {
                    MergeOutcome::Kept
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                MergeOutcome::Inserted
            }
        }
    }

    /// Merge a replicated release. Always removes.
    pub fn merge_release(&self, key: &LockKey) -> Option<LockRecord> {
        self.release(key)
    }

    // -----------------------------------------------------------------------
    // Reads and maintenance
    // -----------------------------------------------------------------------

    pub fn get(&self, key: &LockKey) -> Option<LockRecord> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Owned copies of every entry.
    pub fn snapshot(&self) -> Vec<LockRecord> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn keys(&self) -> Vec<LockKey> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Atomically remove the entry for `key` if `predicate` holds for its
    /// current value.
    pub fn remove_if<F>(&self, key: &LockKey, predicate: F) -> Option<LockRecord>
    where
        F: FnOnce(&LockRecord) -> bool,
    {
        self.entries
            .remove_if(key, |_, record| predicate(record))
            .map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
