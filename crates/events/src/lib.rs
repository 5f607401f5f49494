//! Cluster messaging for lock replication.
//!
//! This crate provides the boundary between the lock coordinator and
//! whatever carries messages between cluster nodes:
//!
//! - [`LockEvent`]: the acquire/release replication message.
//! - [`ClusterTransport`]: outbound seam the coordinator calls on every
//!   local acquire or release.
//! - [`LockEventHandler`]: inbound seam the coordinator exposes to the
//!   transport.
//! - [`ClusterBus`]: in-process fan-out transport backed by
//!   `tokio::sync::broadcast`, used to wire several nodes in one process.
//! - [`ClusterListener`]: background loop that feeds a bus subscription
//!   into a handler.
//! - [`HttpTransport`]: delivers local events to peer nodes over HTTP.

pub mod bus;
pub mod event;
pub mod http;
pub mod listener;
pub mod transport;

pub use bus::{BusTransport, ClusterBus, ClusterEnvelope};
pub use event::{LockEvent, LockEventKind};
pub use http::{HttpTransport, HttpTransportError};
pub use listener::ClusterListener;
pub use transport::{ClusterTransport, LockEventHandler, NodeId, NoopTransport};
