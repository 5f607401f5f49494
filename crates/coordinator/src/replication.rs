//! Bridge between the local [`LockTable`] and the cluster.
//!
//! Outbound: every local acquire and release is turned into a [`LockEvent`]
//! and handed to the [`ClusterTransport`] synchronously, fire-and-forget.
//! The local mutation and the send are not atomic together; a crash in
//! between leaves this node ahead of the cluster until the next sweep or
//! state exchange.
//!
//! Inbound: remote events go through the table's merge rule. Malformed
//! events are dropped and logged, never surfaced as errors.

use std::sync::Arc;

use editlock_core::locking::{validate_lock_key, LockKey, LockRecord};
use editlock_core::types::Timestamp;
use editlock_events::{ClusterTransport, LockEvent, LockEventKind};

use crate::table::{LockTable, MergeOutcome};

/// What applying a remote event did to the local table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Acquire(MergeOutcome),
    /// `true` if an entry was removed.
    Release(bool),
    /// The event was malformed and ignored.
    Dropped,
}

pub struct ReplicationBridge {
    transport: Arc<dyn ClusterTransport>,
}

impl ReplicationBridge {
    pub fn new(transport: Arc<dyn ClusterTransport>) -> Self {
        Self { transport }
    }

    pub fn publish_acquire(&self, record: &LockRecord) {
        self.transport.send(LockEvent::acquire(record));
    }

    pub fn publish_release(&self, key: &LockKey, timestamp: Timestamp) {
        self.transport.send(LockEvent::release(key, timestamp));
    }

    /// Apply an event received from another node.
    pub fn apply(&self, table: &LockTable, event: LockEvent) -> ApplyOutcome {
        if let Err(reason) = validate_lock_key(&event.resource_type, &event.resource_id) {
            tracing::warn!(
                reason = %reason,
                resource_type = %event.resource_type,
                resource_id = %event.resource_id,
                "Dropping malformed remote lock event"
            );
            return ApplyOutcome::Dropped;
        }

        match event.kind() {
            LockEventKind::Acquire => match event.to_record() {
                Some(record) => {
                    let outcome = table.merge_acquire(record);
                    tracing::debug!(
                        resource_type = %event.resource_type,
                        resource_id = %event.resource_id,
                        owner_id = event.owner_id.as_deref().unwrap_or_default(),
                        ?outcome,
                        "Merged remote lock acquire"
                    );
                    ApplyOutcome::Acquire(outcome)
                }
                None => ApplyOutcome::Dropped,
            },
            LockEventKind::Release => {
                let removed = table.merge_release(&event.key()).is_some();
                tracing::debug!(
                    resource_type = %event.resource_type,
                    resource_id = %event.resource_id,
                    removed,
                    "Merged remote lock release"
                );
                ApplyOutcome::Release(removed)
            }
        }
    }

    /// Decode and apply a raw JSON event.
    pub fn apply_bytes(&self, table: &LockTable, bytes: &[u8]) -> ApplyOutcome {
        match LockEvent::decode(bytes) {
            Ok(event) => self.apply(table, event),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    len = bytes.len(),
                    "Dropping undecodable remote lock event"
                );
                ApplyOutcome::Dropped
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
