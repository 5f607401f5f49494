//! Entity-typed adapters over the string-keyed lock operations.
//!
//! An entity maps to `(entity_type_name, primary_key)`; the adapters carry
//! no logic of their own.

use editlock_core::locking::{LockInfo, LockOwner};

use crate::coordinator::LockCoordinator;

/// A domain object that can be locked.
pub trait LockableEntity {
    /// The declared type name, used as the resource type.
    fn entity_type_name(&self) -> &str;

    /// The primary key rendered as a string, used as the resource id.
    fn primary_key(&self) -> String;
}

impl LockCoordinator {
    pub fn lock_entity<E: LockableEntity + ?Sized>(&self, entity: &E) -> Option<LockInfo> {
        self.lock(entity.entity_type_name(), &entity.primary_key())
    }

    pub fn lock_entity_as<E: LockableEntity + ?Sized>(
        &self,
        owner: &LockOwner,
        entity: &E,
    ) -> Option<LockInfo> {
        self.lock_as(owner, entity.entity_type_name(), &entity.primary_key())
    }

    pub fn unlock_entity<E: LockableEntity + ?Sized>(&self, entity: &E) -> bool {
        self.unlock(entity.entity_type_name(), &entity.primary_key())
    }

    pub fn entity_lock_info<E: LockableEntity + ?Sized>(&self, entity: &E) -> Option<LockInfo> {
        self.lock_info(entity.entity_type_name(), &entity.primary_key())
    }
}
