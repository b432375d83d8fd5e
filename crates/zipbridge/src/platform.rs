//! Tracing-backed platform implementation.
//!
//! The daemon's default host seam: every platform call becomes a log
//! line. Real host integrations implement `Platform` and replace this
//! at construction.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use zipbridge_core::{Accessory, Characteristic, CharacteristicValue, CoreError, Platform};

pub struct TracingPlatform;

#[async_trait]
impl Platform for TracingPlatform {
    async fn register_accessories(&self, accessories: &[Accessory]) -> Result<(), CoreError> {
        for accessory in accessories {
            info!(
                uuid = %accessory.uuid,
                name = %accessory.display_name,
                kind = %accessory.kind,
                scene = accessory.is_scene,
                "accessory registered"
            );
        }
        Ok(())
    }

    async fn update_reachability(&self, uuid: Uuid, reachable: bool) {
        info!(%uuid, reachable, "accessory reachability changed");
    }

    async fn push_characteristic(
        &self,
        uuid: Uuid,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) {
        info!(%uuid, %characteristic, ?value, "characteristic pushed");
    }
}
