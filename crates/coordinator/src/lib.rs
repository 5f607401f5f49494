//! Replicated, advisory, pessimistic lock coordinator.
//!
//! The building blocks, leaves first:
//!
//! - [`registry::LockDescriptorRegistry`]: lazily built map from resource
//!   type to lock policy, fed by [`providers::DescriptorSource`]s.
//! - [`table::LockTable`]: the local concurrent lock table and its
//!   timestamp-gated merge rule.
//! - [`replication::ReplicationBridge`]: publishes local events and applies
//!   remote ones through the merge rule.
//! - [`sweeper`]: eviction of expired and orphaned entries.
//! - [`state_transfer`]: snapshot export/import for joining nodes.
//! - [`coordinator::LockCoordinator`]: the facade applications call.

pub mod context;
pub mod coordinator;
pub mod entity;
pub mod providers;
pub mod registry;
pub mod replication;
pub mod state_transfer;
pub mod sweeper;
pub mod table;

pub use context::{LockContext, ManualContext, SystemContext};
pub use coordinator::LockCoordinator;
pub use entity::LockableEntity;
pub use providers::{DescriptorSource, FileDescriptorProvider, StaticDescriptorProvider};
pub use registry::LockDescriptorRegistry;
pub use sweeper::SweepReport;
pub use table::{LockTable, MergeOutcome};
