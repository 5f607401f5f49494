//! Eviction of expired and orphaned lock entries.
//!
//! One pass snapshots the key set, then decides per key:
//!
//! - the resource type has no descriptor any more (orphan) → remove;
//! - the descriptor has a positive timeout and the lock is older than it →
//!   remove;
//! - otherwise keep.
//!
//! Removal is re-checked atomically against the entry's current value, so a
//! lock replaced by a fresher one between snapshot and eviction survives.
//! Sweeping is local only: no release event is broadcast for evictions.
//! Other nodes drop the same entries on their own sweep.

use std::time::Duration;

use editlock_core::locking::{LockDescriptor, LockRecord};
use editlock_core::types::Timestamp;
use serde::Serialize;

use crate::registry::LockDescriptorRegistry;
use crate::table::LockTable;

/// Counts from one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Keys examined.
    pub scanned: usize,
    /// Entries removed because their type lost its descriptor.
    pub orphaned: usize,
    /// Entries removed because their timeout elapsed.
    pub expired: usize,
}

impl SweepReport {
    pub fn evicted(&self) -> usize {
        self.orphaned + self.expired
    }
}

enum Verdict {
    Keep,
    Orphaned,
    Expired,
}

/// Run a single sweep pass over `table` at time `now`.
pub fn sweep(table: &LockTable, registry: &LockDescriptorRegistry, now: Timestamp) -> SweepReport {
    let descriptors = registry.descriptors();
    let mut report = SweepReport::default();

    for key in table.keys() {
        report.scanned += 1;

        let timeout = descriptors.get(&key.resource_type).map(LockDescriptor::expires);

        let mut verdict = Verdict::Keep;
        table.remove_if(&key, |record| {
            verdict = judge(record, timeout, now);
            !matches!(verdict, Verdict::Keep)
        });

        match verdict {
            Verdict::Keep => {}
            Verdict::Orphaned => {
                report.orphaned += 1;
                tracing::debug!(%key, "Evicted orphaned lock");
            }
            Verdict::Expired => {
                report.expired += 1;
                tracing::debug!(%key, "Evicted expired lock");
            }
        }
    }

    report
}

/// `timeout` is `None` when the type has no descriptor, `Some(None)` when
/// the descriptor never expires.
fn judge(record: &LockRecord, timeout: Option<Option<Duration>>, now: Timestamp) -> Verdict {
    match timeout {
        None => Verdict::Orphaned,
        Some(None) => Verdict::Keep,
        Some(Some(limit)) => {
            let age = now.signed_duration_since(record.acquired_at);
            match chrono::Duration::from_std(limit) {
                Ok(limit) if age > limit => Verdict::Expired,
                _ => Verdict::Keep,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
