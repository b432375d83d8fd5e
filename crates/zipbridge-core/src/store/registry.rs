// ── Accessory registry ──
//
// Concurrent storage with push-based change notification via `watch`
// channels. The module UUID is the only key, and the registry enforces
// the one-accessory-per-UUID invariant: discovery of a known UUID
// updates the existing entry instead of creating a duplicate.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use uuid::Uuid;

use crate::model::{Accessory, AccessoryKind};

/// Outcome of a discovery upsert.
pub enum Discovered {
    /// First sighting of this UUID; the accessory was created.
    Created(Arc<Accessory>),
    /// The UUID was already registered; reachability and the scene flag
    /// were refreshed.
    Updated(Arc<Accessory>),
}

impl Discovered {
    pub fn accessory(&self) -> &Arc<Accessory> {
        match self {
            Self::Created(a) | Self::Updated(a) => a,
        }
    }
}

/// Reactive accessory collection keyed by module UUID.
///
/// Every mutation bumps a version counter and rebuilds the snapshot
/// that subscribers receive.
pub struct AccessoryRegistry {
    by_uuid: DashMap<Uuid, Arc<Accessory>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<Accessory>>>>,
}

impl Default for AccessoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessoryRegistry {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_uuid: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert an accessory restored from the host platform's cache.
    ///
    /// Restored accessories start unreachable; discovery flips them
    /// once the box confirms the module still exists.
    pub fn restore(&self, mut accessory: Accessory) {
        accessory.reachable = false;
        self.by_uuid.insert(accessory.uuid, Arc::new(accessory));
        self.rebuild_snapshot();
        self.bump_version();
    }

    /// Apply a discovery sighting of a module.
    ///
    /// A known UUID is marked reachable and has its scene flag
    /// re-derived; display name, kind, and the brightness cache are
    /// left as they were. An unknown UUID becomes a new accessory.
    pub fn upsert_discovered(
        &self,
        uuid: Uuid,
        display_name: String,
        kind: AccessoryKind,
        is_scene: bool,
    ) -> Discovered {
        let outcome = if let Some(existing) = self.by_uuid.get(&uuid).map(|r| Arc::clone(r.value()))
        {
            let mut updated = (*existing).clone();
            updated.reachable = true;
            updated.is_scene = is_scene;
            let updated = Arc::new(updated);
            self.by_uuid.insert(uuid, Arc::clone(&updated));
            Discovered::Updated(updated)
        } else {
            let mut accessory = Accessory::new(uuid, display_name, kind);
            accessory.is_scene = is_scene;
            let accessory = Arc::new(accessory);
            self.by_uuid.insert(uuid, Arc::clone(&accessory));
            Discovered::Created(accessory)
        };

        self.rebuild_snapshot();
        self.bump_version();
        outcome
    }

    /// Cache a brightness level. Returns `false` if the UUID is unknown.
    pub fn set_brightness(&self, uuid: Uuid, level: u8) -> bool {
        let Some(existing) = self.by_uuid.get(&uuid).map(|r| Arc::clone(r.value())) else {
            return false;
        };
        let mut updated = (*existing).clone();
        updated.brightness = Some(level);
        self.by_uuid.insert(uuid, Arc::new(updated));
        self.rebuild_snapshot();
        self.bump_version();
        true
    }

    /// Look up an accessory by UUID.
    pub fn get(&self, uuid: Uuid) -> Option<Arc<Accessory>> {
        self.by_uuid.get(&uuid).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<Accessory>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Accessory>>>> {
        self.snapshot.subscribe()
    }

    pub fn len(&self) -> usize {
        self.by_uuid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uuid.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<Accessory>> =
            self.by_uuid.iter().map(|r| Arc::clone(r.value())).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
