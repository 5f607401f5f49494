//! In-process cluster bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ClusterBus`] connects several coordinators living in one process (tests,
//! embedded multi-tenant setups). Each node gets a [`BusTransport`] that
//! tags outbound events with its [`NodeId`], and a subscription that a
//! [`ClusterListener`](crate::listener::ClusterListener) drains.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::event::LockEvent;
use crate::transport::{ClusterTransport, NodeId};

// ---------------------------------------------------------------------------
// ClusterEnvelope
// ---------------------------------------------------------------------------

/// A lock event together with the node that emitted it.
#[derive(Debug, Clone)]
pub struct ClusterEnvelope {
    pub origin: NodeId,
    pub event: LockEvent,
}

// ---------------------------------------------------------------------------
// ClusterBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus shared by every node of a local cluster.
///
/// # Usage
///
/// ```rust
/// use std::sync::Arc;
/// use editlock_events::{ClusterBus, ClusterTransport, NodeId, LockEvent};
/// use editlock_core::locking::LockKey;
///
/// let bus = Arc::new(ClusterBus::default());
/// let _rx = bus.subscribe();
///
/// let transport = ClusterBus::transport(&bus, NodeId::random());
/// transport.send(LockEvent::release(&LockKey::new("invoice", "1"), chrono::Utc::now()));
/// ```
pub struct ClusterBus {
    sender: broadcast::Sender<ClusterEnvelope>,
}

impl ClusterBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed envelopes are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an envelope to every subscribed node.
    ///
    /// With no subscribers the envelope is silently dropped.
    pub fn publish(&self, envelope: ClusterEnvelope) {
        let _ = self.sender.send(envelope);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClusterEnvelope> {
        self.sender.subscribe()
    }

    /// Build the outbound transport for `node`.
    pub fn transport(bus: &Arc<Self>, node: NodeId) -> BusTransport {
        BusTransport {
            bus: Arc::clone(bus),
            node,
        }
    }
}

impl Default for ClusterBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// BusTransport
// ---------------------------------------------------------------------------

/// [`ClusterTransport`] that publishes onto a shared [`ClusterBus`].
#[derive(Clone)]
pub struct BusTransport {
    bus: Arc<ClusterBus>,
    node: NodeId,
}

impl BusTransport {
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl ClusterTransport for BusTransport {
    fn send(&self, event: LockEvent) {
        self.bus.publish(ClusterEnvelope {
            origin: self.node,
            event,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
