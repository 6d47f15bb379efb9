//! In-memory VRF id → metadata cache.
//!
//! The only core-owned mutable shared state. All mutation goes through the
//! named operations below so the lock discipline stays auditable; the map
//! itself never escapes the lock. Reconciliation only adds and updates;
//! entries disappear exclusively through [`VrfCache::remove`], so an entry
//! created while a reconciliation dump is in flight is never lost.

use crate::domain::VrfEntry;
use crate::error::CoreError;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct VrfCache {
    entries: RwLock<HashMap<u32, VrfEntry>>,
}

impl VrfCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry for `id`.
    pub fn upsert(&self, id: u32, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(id, %name, "VRF cache upsert");
        self.entries.write().insert(id, VrfEntry { name });
    }

    /// Removes the entry for `id`; absent ids are a no-op.
    pub fn remove(&self, id: u32) {
        if self.entries.write().remove(&id).is_some() {
            tracing::debug!(id, "VRF cache entry removed");
        }
    }

    /// Point lookup. An unknown VRF is an error, distinguishable from a
    /// VRF with an empty name.
    pub fn get(&self, id: u32) -> Result<VrfEntry, CoreError> {
        self.entries
            .read()
            .get(&id)
            .cloned()
            .ok_or(CoreError::VrfNotFound { id })
    }

    /// Inserts-or-updates every entry from a dataplane table dump. Entries
    /// absent from the dump are kept.
    pub fn reconcile(&self, entries: impl IntoIterator<Item = (u32, String)>) {
        let mut map = self.entries.write();
        let mut count = 0usize;
        for (id, name) in entries {
            map.insert(id, VrfEntry { name });
            count += 1;
        }
        tracing::debug!(count, total = map.len(), "VRF cache reconciled");
    }

    /// Read-only copy of the current entries, for merge passes.
    pub fn snapshot(&self) -> Vec<(u32, VrfEntry)> {
        self.entries
            .read()
            .iter()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
