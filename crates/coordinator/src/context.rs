//! Clock and identity collaborator.
//!
//! The coordinator only asks "what time is it" and "who is calling" when it
//! stamps a new lock record (and the sweep asks for the time). Both answers
//! come from an injected [`LockContext`].

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use editlock_core::locking::LockOwner;
use editlock_core::types::Timestamp;

/// Source of the current time and the current user.
pub trait LockContext: Send + Sync {
    fn now(&self) -> Timestamp;
    fn current_user(&self) -> LockOwner;
}

// ---------------------------------------------------------------------------
// SystemContext
// ---------------------------------------------------------------------------

/// Wall clock plus a fixed owner.
///
/// Suitable for service processes where the acting user is passed
/// explicitly per request and [`LockContext::current_user`] is only a
/// fallback.
#[derive(Debug, Clone)]
pub struct SystemContext {
    owner: LockOwner,
}

impl SystemContext {
    pub fn new(owner: LockOwner) -> Self {
        Self { owner }
    }
}

impl Default for SystemContext {
    fn default() -> Self {
        Self::new(LockOwner::new("system", "System"))
    }
}

impl LockContext for SystemContext {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn current_user(&self) -> LockOwner {
        self.owner.clone()
    }
}

// ---------------------------------------------------------------------------
// ManualContext
// ---------------------------------------------------------------------------

/// A context whose time and user are set by hand.
///
/// Used by tests and simulations that need deterministic timestamps.
#[derive(Debug)]
pub struct ManualContext {
    now: Mutex<Timestamp>,
    user: Mutex<LockOwner>,
}

impl ManualContext {
    pub fn new(now: Timestamp, user: LockOwner) -> Self {
        Self {
            now: Mutex::new(now),
            user: Mutex::new(user),
        }
    }

    pub fn set_now(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move the clock forward (or backward, for a negative delta).
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }

    pub fn set_user(&self, user: LockOwner) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

impl LockContext for ManualContext {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_user(&self) -> LockOwner {
        self.user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
