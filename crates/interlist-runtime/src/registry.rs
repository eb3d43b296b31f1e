//! Concurrent class registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::klass::{KlassBuilder, KlassId, KlassRef};

/// Owns every class defined in a [`HostVm`](crate::HostVm).
///
/// Ids are never reused, so a `KlassId` stays a valid identity for the life
/// of the registry. Names are not unique: defining a second class with an
/// existing name creates a new identity and makes the name resolve to it.
pub struct ClassRegistry {
    classes: DashMap<KlassId, KlassRef>,
    by_name: DashMap<String, KlassId>,
    next_id: AtomicU32,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self {
            classes: DashMap::new(),
            by_name: DashMap::new(),
            next_id: AtomicU32::new(1), // 0 is never a valid class
        }
    }

    pub fn define(&self, builder: KlassBuilder) -> KlassRef {
        let id = KlassId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let klass = Arc::new(builder.build(id));
        self.classes.insert(id, Arc::clone(&klass));
        self.by_name.insert(klass.name().to_string(), id);
        debug!(name = klass.name(), %id, "defined class");
        klass
    }

    pub fn get(&self, id: KlassId) -> Option<KlassRef> {
        self.classes.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn by_name(&self, name: &str) -> Option<KlassRef> {
        let id = *self.by_name.get(name)?;
        self.get(id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All classes, ordered by id.
    pub fn classes(&self) -> Vec<KlassRef> {
        let mut classes: Vec<_> = self
            .classes
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        classes.sort_by_key(|k| k.id());
        classes
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
