//! Inbound replication loop.
//!
//! [`ClusterListener`] drains a [`ClusterBus`](crate::bus::ClusterBus)
//! subscription and hands every event published by another node to a
//! [`LockEventHandler`]. It runs as a long-lived background task and shuts
//! down when the bus is dropped.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::bus::ClusterEnvelope;
use crate::transport::{LockEventHandler, NodeId};

/// Background service that applies remote lock events to a local node.
pub struct ClusterListener;

impl ClusterListener {
    /// Run the listener loop for `node`.
    ///
    /// Envelopes emitted by `node` itself are skipped. The loop exits when
    /// the channel is closed.
    pub async fn run(
        node: NodeId,
        mut receiver: broadcast::Receiver<ClusterEnvelope>,
        handler: Arc<dyn LockEventHandler>,
    ) {
        loop {
            match receiver.recv().await {
                Ok(envelope) => {
                    if envelope.origin == node {
                        continue;
                    }
                    tracing::trace!(
                        %node,
                        origin = %envelope.origin,
                        resource_type = %envelope.event.resource_type,
                        resource_id = %envelope.event.resource_id,
                        "Applying remote lock event"
                    );
                    handler.receive(envelope.event);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        %node,
                        skipped = n,
                        "Cluster listener lagged, some lock events were not applied"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(%node, "Cluster bus closed, listener shutting down");
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
