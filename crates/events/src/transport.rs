//! The two seams between the coordinator and the cluster.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::LockEvent;

/// Identity of a node in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// A fresh random node id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::random()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outbound side: publishes local lock events to the rest of the cluster.
///
/// `send` is fire-and-forget. Delivery latency, retries and failures are the
/// transport's concern; implementations must not block the caller on I/O.
pub trait ClusterTransport: Send + Sync {
    fn send(&self, event: LockEvent);
}

/// Inbound side: the entry point a transport calls for every event
/// published by another node.
pub trait LockEventHandler: Send + Sync {
    fn receive(&self, event: LockEvent);
}

/// Transport for a single-node deployment. Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTransport;

impl ClusterTransport for NoopTransport {
    fn send(&self, event: LockEvent) {
        tracing::trace!(
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            "No cluster transport configured, dropping lock event"
        );
    }
}
