//! HTTP delivery of lock events to peer nodes.
//!
//! [`HttpTransport`] POSTs every local [`LockEvent`] as JSON to each peer's
//! `/api/v1/cluster/events` endpoint. Each peer has its own delivery task
//! fed by an unbounded channel, so `send` never waits on the network and
//! events for one peer arrive in the order they were sent. Failed
//! deliveries are logged and dropped; a peer that missed events catches up
//! through state transfer.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::event::LockEvent;
use crate::transport::{ClusterTransport, NodeId};

/// Path of the inbound event endpoint on every node.
pub const CLUSTER_EVENTS_PATH: &str = "/api/v1/cluster/events";

/// HTTP request timeout for a single delivery.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum HttpTransportError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The peer answered with a non-2xx status code.
    #[error("Peer returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// Outbound transport that replicates lock events to peers over HTTP.
pub struct HttpTransport {
    peers: Vec<mpsc::UnboundedSender<LockEvent>>,
}

impl HttpTransport {
    /// Start one delivery task per peer base URL (e.g.
    /// `http://10.0.0.2:3000`).
    ///
    /// Must be called from within a Tokio runtime. The tasks stop once the
    /// transport is dropped and their queues are drained.
    pub fn spawn(origin: NodeId, peer_urls: &[String]) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");

        let peers = peer_urls
            .iter()
            .map(|base| {
                let (tx, rx) = mpsc::unbounded_channel();
                tokio::spawn(deliver_loop(origin, client.clone(), events_url(base), rx));
                tx
            })
            .collect();

        Self { peers }
    }

    /// Number of peers this transport delivers to.
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}

impl ClusterTransport for HttpTransport {
    fn send(&self, event: LockEvent) {
        for peer in &self.peers {
            if peer.send(event.clone()).is_err() {
                tracing::warn!(
                    resource_type = %event.resource_type,
                    resource_id = %event.resource_id,
                    "Peer delivery task has stopped, dropping lock event"
                );
            }
        }
    }
}

/// The inbound event endpoint for a peer base URL.
pub fn events_url(base: &str) -> String {
    format!("{}{CLUSTER_EVENTS_PATH}", base.trim().trim_end_matches('/'))
}

async fn deliver_loop(
    origin: NodeId,
    client: reqwest::Client,
    url: String,
    mut receiver: mpsc::UnboundedReceiver<LockEvent>,
) {
    while let Some(event) = receiver.recv().await {
        if let Err(e) = post_event(&client, &url, &event).await {
            tracing::warn!(
                %origin,
                url = %url,
                resource_type = %event.resource_type,
                resource_id = %event.resource_id,
                error = %e,
                "Failed to deliver lock event to peer"
            );
        }
    }
    tracing::debug!(%origin, url = %url, "Peer delivery task stopped");
}

async fn post_event(
    client: &reqwest::Client,
    url: &str,
    event: &LockEvent,
) -> Result<(), HttpTransportError> {
    let response = client.post(url).json(event).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(HttpTransportError::HttpStatus(status.as_u16()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
