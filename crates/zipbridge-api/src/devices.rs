// Box device and module endpoints
//
// Enumeration of the box's module groups, attribute value writes, and
// scene triggering. Enumeration fills the client's module cache; writes
// resolve the attribute UUID from that cache.

use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::client::ZipatoClient;
use crate::error::Error;
use crate::models::{Device, Module};

/// The module groups the box exposes. Each group that returns modules
/// becomes one `Device`.
const MODULE_GROUPS: &[&str] = &[
    "lights",
    "switches",
    "scenes",
    "meters",
    "sensors",
    "thermostats",
];

impl ZipatoClient {
    /// Enumerate the box's module groups.
    ///
    /// `GET {group}?full=true` per group; empty groups are dropped.
    /// Every module seen is cached by UUID for later reads and writes.
    pub async fn load_devices(&self) -> Result<Vec<Device>, Error> {
        let mut devices = Vec::new();

        for &group in MODULE_GROUPS {
            let url = self.api_url(&format!("{group}?full=true"))?;
            let modules: Vec<Module> = self.get(url).await?;
            debug!(group, count = modules.len(), "loaded module group");

            for module in &modules {
                self.cache_module(module.clone());
            }

            if !modules.is_empty() {
                devices.push(Device {
                    name: group.to_owned(),
                    modules,
                });
            }
        }

        Ok(devices)
    }

    /// Write an attribute value on a module.
    ///
    /// The attribute is addressed by its own UUID, resolved from the
    /// cached module: `PUT attributes/{attribute_uuid}/value` with
    /// `{"value": ...}`.
    pub async fn set_module_value(
        &self,
        module_uuid: Uuid,
        code: u16,
        value: serde_json::Value,
    ) -> Result<(), Error> {
        let module = self
            .module(module_uuid)
            .ok_or(Error::ModuleNotFound { uuid: module_uuid })?;
        let attribute = module.attribute(code).ok_or(Error::AttributeNotFound {
            uuid: module_uuid,
            code,
        })?;
        let attribute_uuid = attribute.uuid.ok_or(Error::NotWritable {
            uuid: module_uuid,
            code,
        })?;

        let url = self.api_url(&format!("attributes/{attribute_uuid}/value"))?;
        debug!(%module_uuid, code, %value, "writing attribute value");
        self.put(url, &json!({ "value": value })).await
    }

    /// Trigger a scene: `GET scenes/{uuid}/run`.
    ///
    /// Scenes are momentary; the box acknowledges the trigger and the
    /// caller models the reset.
    pub async fn run_scene(&self, uuid: Uuid) -> Result<(), Error> {
        let url = self.api_url(&format!("scenes/{uuid}/run"))?;
        debug!(%uuid, "running scene");
        self.get_ack(url).await
    }
}
