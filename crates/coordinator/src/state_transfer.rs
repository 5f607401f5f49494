//! Bulk export/import of the lock table for nodes joining the cluster.
//!
//! The payload is a versioned JSON document. Neither direction reports
//! failure to the caller: an export that cannot be serialized yields an
//! empty payload, and an empty, malformed or unknown-version payload is an
//! import no-op. Imported records go through the acquire merge rule, so a
//! stale snapshot never regresses a fresher local entry.

use editlock_core::locking::{LockRecord, STATE_FORMAT_VERSION};
use serde::{Deserialize, Serialize};

use crate::table::LockTable;

#[derive(Debug, Serialize, Deserialize)]
struct StateSnapshot {
    version: u32,
    locks: Vec<LockRecord>,
}

/// Serialize every entry of `table`. Returns an empty payload on failure.
pub fn export_state(table: &LockTable) -> Vec<u8> {
    let snapshot = StateSnapshot {
        version: STATE_FORMAT_VERSION,
        locks: table.snapshot(),
    };
    match serde_json::to_vec(&snapshot) {
        Ok(bytes) => {
            tracing::debug!(
                locks = snapshot.locks.len(),
                bytes = bytes.len(),
                "Exported lock state"
            );
            bytes
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize lock state, exporting nothing");
            Vec::new()
        }
    }
}

/// Merge the records in `payload` into `table`.
///
/// Returns how many entries were inserted or replaced.
pub fn import_state(table: &LockTable, payload: &[u8]) -> usize {
    if payload.is_empty() {
        tracing::debug!("Empty lock state payload, nothing to import");
        return 0;
    }

    let snapshot: StateSnapshot = match serde_json::from_slice(payload) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, bytes = payload.len(), "Ignoring malformed lock state");
            return 0;
        }
    };

    if snapshot.version != STATE_FORMAT_VERSION {
        tracing::warn!(
            version = snapshot.version,
            expected = STATE_FORMAT_VERSION,
            "Ignoring lock state with unsupported version"
        );
        return 0;
    }

    let received = snapshot.locks.len();
    let changed = snapshot
        .locks
        .into_iter()
        .map(|record| table.merge_acquire(record))
        .filter(|outcome| outcome.changed())
        .count();

    tracing::info!(received, changed, "Imported lock state");
    changed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
