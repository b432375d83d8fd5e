// ── Host-platform seam ──
//
// The bridge consumes the host platform through this trait and never
// through shared globals: the handle is injected at construction and
// travels with the bridge, so box-side callbacks reach the platform
// without any process-wide state.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{Accessory, Characteristic, CharacteristicValue};

/// The host-platform operations the bridge consumes.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Announce newly created accessories to the host.
    ///
    /// Called once per discovery pass with the accessories first seen in
    /// that pass; never called twice for the same UUID.
    async fn register_accessories(&self, accessories: &[Accessory]) -> Result<(), CoreError>;

    /// Update the reachability flag of a known accessory.
    async fn update_reachability(&self, uuid: Uuid, reachable: bool);

    /// Push a bridge-initiated characteristic change to the host
    /// (e.g. the automatic off after a scene trigger).
    async fn push_characteristic(
        &self,
        uuid: Uuid,
        characteristic: Characteristic,
        value: CharacteristicValue,
    );
}
