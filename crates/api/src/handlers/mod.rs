//! Request handlers.
//!
//! Each submodule groups the async handler functions for one area of the
//! API. Handlers call into [`LockCoordinator`] and map errors via
//! [`AppError`].
//!
//! [`LockCoordinator`]: editlock_coordinator::LockCoordinator
//! [`AppError`]: crate::error::AppError

pub mod admin;
pub mod cluster;
pub mod locks;
