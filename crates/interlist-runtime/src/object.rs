//! Host object instances.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::klass::KlassRef;
use crate::value::Value;

/// An instance of a host class. Its class never changes.
pub struct HostObject {
    klass: KlassRef,
    slots: RwLock<Vec<Value>>,
}

pub type ObjectRef = Arc<HostObject>;

impl HostObject {
    pub fn new(klass: KlassRef, slots: Vec<Value>) -> Self {
        Self {
            klass,
            slots: RwLock::new(slots),
        }
    }

    pub fn klass(&self) -> &KlassRef {
        &self.klass
    }

    pub fn slots(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn slots_mut(&self) -> RwLockWriteGuard<'_, Vec<Value>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("klass", &self.klass)
            .field("slots", &*self.slots())
            .finish()
    }
}
