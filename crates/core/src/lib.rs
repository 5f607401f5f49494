//! Shared value types for the advisory lock coordinator.
//!
//! This crate has no internal dependencies so that the coordinator, the
//! cluster messaging layer and the HTTP surface can all agree on the same
//! lock identity, record shape and policy types.

pub mod error;
pub mod locking;
pub mod types;
