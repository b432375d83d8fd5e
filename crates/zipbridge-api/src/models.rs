// Box API response types
//
// Models for the Zipato box's v2 JSON API. Group endpoints return bare
// arrays of modules; session endpoints return `{ "success": bool, ... }`
// status objects. Fields use `#[serde(default)]` liberally because the box
// is inconsistent about field presence across firmware versions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Attribute codes ──────────────────────────────────────────────────
//
// Small integer codes the box assigns to well-known attribute types.

/// Brightness / dimmer slider.
pub const ATTR_SLIDER: u16 = 8;
/// On/off switch state.
pub const ATTR_SWITCH: u16 = 11;
/// Meter reading (temperature, power, ...). The `definition.name`
/// distinguishes what is being metered.
pub const ATTR_METER: u16 = 95;

// ── Session responses ────────────────────────────────────────────────

/// Response from `GET user/init`.
///
/// Establishes the session cookie and hands out the login nonce:
/// ```json
/// { "success": true, "nonce": "5f3c..." }
/// ```
#[derive(Debug, Deserialize)]
pub struct InitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Generic status object returned by session endpoints
/// (`user/login`, `user/logout`, scene runs on some firmwares).
///
/// `success` is optional because write acknowledgements may omit it;
/// only an explicit `false` counts as failure.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Whether the box explicitly reported failure.
    pub fn failed(&self) -> bool {
        self.success == Some(false)
    }
}

/// Box identity from `GET box`, logged after a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub firmware_upgrade_available: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Devices and modules ──────────────────────────────────────────────

/// A named group of modules, as reported by the box.
///
/// The box organizes its controllable points into fixed groups
/// (`"lights"`, `"scenes"`, `"meters"`, ...); each group maps onto one
/// `Device` after enumeration.
#[derive(Debug, Clone)]
pub struct Device {
    pub name: String,
    pub modules: Vec<Module>,
}

/// One controllable point within a device group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub uuid: Uuid,
    #[serde(default)]
    pub name: String,
    /// Attribute code -> attribute. Absent on some modules (the box
    /// reports bare placeholders for unconfigured endpoints); an empty
    /// map classifies as nothing rather than failing enumeration.
    #[serde(default)]
    pub attributes: BTreeMap<u16, Attribute>,
    /// REST path for triggering this module as a scene. Presence marks
    /// the module as a momentary scene trigger.
    #[serde(default)]
    pub uri_run: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Module {
    /// Whether this module is a momentary scene trigger.
    pub fn is_scene(&self) -> bool {
        self.uri_run.is_some()
    }

    /// Look up an attribute by its code.
    pub fn attribute(&self, code: u16) -> Option<&Attribute> {
        self.attributes.get(&code)
    }
}

/// A single attribute of a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    /// The attribute's own UUID, needed to address it for writes.
    #[serde(default)]
    pub uuid: Option<Uuid>,
    /// Last reported value. The box serializes most values as strings
    /// regardless of type ("21.5", "true").
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub definition: Option<AttributeDefinition>,
}

impl Attribute {
    /// The attribute's definition name (e.g. `"TEMPERATURE"`), if known.
    pub fn definition_name(&self) -> Option<&str> {
        self.definition.as_ref().and_then(|d| d.name.as_deref())
    }

    /// Parse the reported value as a float, accepting both JSON numbers
    /// and the box's stringified numbers.
    pub fn value_as_f64(&self) -> Option<f64> {
        match self.value.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Attribute type metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
