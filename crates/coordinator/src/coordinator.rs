//! The public facade over the lock table, registry, replication, sweep and
//! state transfer.
//!
//! A [`LockCoordinator`] is an explicit instance wired with its
//! collaborators; share it as `Arc<LockCoordinator>`. It is also the
//! [`LockEventHandler`] the cluster transport delivers remote events to.

use std::sync::Arc;

use editlock_core::locking::{validate_lock_key, LockInfo, LockKey, LockOwner, LockRecord};
use editlock_events::{ClusterTransport, LockEvent, LockEventHandler};

use crate::context::LockContext;
use crate::registry::LockDescriptorRegistry;
use crate::replication::{ApplyOutcome, ReplicationBridge};
use crate::state_transfer;
use crate::sweeper::{self, SweepReport};
use crate::table::LockTable;

pub struct LockCoordinator {
    table: LockTable,
    registry: LockDescriptorRegistry,
    replication: ReplicationBridge,
    context: Arc<dyn LockContext>,
}

impl LockCoordinator {
    pub fn new(
        registry: LockDescriptorRegistry,
        context: Arc<dyn LockContext>,
        transport: Arc<dyn ClusterTransport>,
    ) -> Self {
        Self {
            table: LockTable::new(),
            registry,
            replication: ReplicationBridge::new(transport),
            context,
        }
    }

    // -----------------------------------------------------------------------
    // Lock / unlock
    // -----------------------------------------------------------------------

    /// Try to lock a resource on behalf of the context's current user.
    ///
    /// Returns `None` when the caller now holds the lock. Otherwise returns
    /// the current holder, or [`LockInfo::NotSupported`] when the resource
    /// type has no lock policy (locking is not enforced for it) or the key
    /// is malformed.
    pub fn lock(&self, resource_type: &str, resource_id: &str) -> Option<LockInfo> {
        let owner = self.context.current_user();
        self.lock_as(&owner, resource_type, resource_id)
    }

    /// Like [`lock`](Self::lock) with an explicit owner.
    pub fn lock_as(
        &self,
        owner: &LockOwner,
        resource_type: &str,
        resource_id: &str,
    ) -> Option<LockInfo> {
        // Peers apply the same check on receipt.
        if let Err(reason) = validate_lock_key(resource_type, resource_id) {
            tracing::warn!(resource_type, resource_id, %reason, "Rejected malformed lock key");
            return Some(LockInfo::NotSupported);
        }

        let key = LockKey::new(resource_type, resource_id);

        if let Some(holder) = self.table.get(&key) {
            return Some(LockInfo::Locked(holder));
        }

        if self.registry.get(resource_type).is_none() {
            return Some(LockInfo::NotSupported);
        }

        let record = LockRecord::new(&key, owner, self.context.now());
        // Someone may have slipped in between the check above and here.
        if let Some(winner) = self.table.try_acquire(record.clone()) {
            return Some(LockInfo::Locked(winner));
        }

        self.replication.publish_acquire(&record);
        tracing::info!(
            resource_type,
            resource_id,
            owner_id = %owner.id,
            "Lock acquired"
        );
        None
    }

    /// Release the lock on a resource, whoever holds it.
    ///
    /// Returns `true` if a lock was removed (and a release broadcast).
    /// Unlocking a free resource is a no-op.
    pub fn unlock(&self, resource_type: &str, resource_id: &str) -> bool {
        let key = LockKey::new(resource_type, resource_id);
        match self.table.release(&key) {
            Some(previous) => {
                self.replication.publish_release(&key, self.context.now());
                tracing::info!(
                    resource_type,
                    resource_id,
                    owner_id = %previous.owner_id,
                    "Lock released"
                );
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Who holds a resource: `NotSupported` if the type has no lock policy,
    /// `Locked(holder)` if held, `None` if free.
    pub fn lock_info(&self, resource_type: &str, resource_id: &str) -> Option<LockInfo> {
        if self.registry.get(resource_type).is_none() {
            return Some(LockInfo::NotSupported);
        }
        self.table
            .get(&LockKey::new(resource_type, resource_id))
            .map(LockInfo::Locked)
    }

    /// A copy of every lock this node knows about.
    pub fn current_locks(&self) -> Vec<LockRecord> {
        self.table.snapshot()
    }

    pub fn registry(&self) -> &LockDescriptorRegistry {
        &self.registry
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Drop the cached lock policies. Existing entries are left alone and
    /// reconciled by the next sweep.
    pub fn reload_configuration(&self) {
        self.registry.reload();
    }

    /// Run one expiration sweep now.
    pub fn expire_locks(&self) -> SweepReport {
        sweeper::sweep(&self.table, &self.registry, self.context.now())
    }

    // -----------------------------------------------------------------------
    // Cluster
    // -----------------------------------------------------------------------

    /// Snapshot of the table for a joining node. Empty on failure.
    pub fn export_state(&self) -> Vec<u8> {
        state_transfer::export_state(&self.table)
    }

    /// Merge a snapshot produced by [`export_state`](Self::export_state).
    /// Returns how many entries changed.
    pub fn import_state(&self, payload: &[u8]) -> usize {
        state_transfer::import_state(&self.table, payload)
    }

    /// Apply a raw JSON event published by another node.
    pub fn receive_bytes(&self, bytes: &[u8]) -> ApplyOutcome {
        self.replication.apply_bytes(&self.table, bytes)
    }

    /// Apply an event published by another node.
    pub fn apply_remote(&self, event: LockEvent) -> ApplyOutcome {
        self.replication.apply(&self.table, event)
    }
}

impl LockEventHandler for LockCoordinator {
    fn receive(&self, event: LockEvent) {
        self.apply_remote(event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
