// ── Accessory domain types ──

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of host-platform accessory a box module maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum AccessoryKind {
    Lightbulb,
    Switch,
    TemperatureSensor,
}

impl AccessoryKind {
    /// Whether accessories of this kind serve the given characteristic.
    pub fn supports(self, characteristic: Characteristic) -> bool {
        matches!(
            (self, characteristic),
            (Self::Lightbulb, Characteristic::On | Characteristic::Brightness)
                | (Self::Switch, Characteristic::On)
                | (Self::TemperatureSensor, Characteristic::CurrentTemperature)
        )
    }
}

/// The characteristics the bridge serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Characteristic {
    On,
    Brightness,
    CurrentTemperature,
}

/// A characteristic value crossing the platform seam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CharacteristicValue {
    Bool(bool),
    /// Brightness percent, 0-100.
    Int(u8),
    /// Temperature in the box's configured unit.
    Float(f64),
}

impl CharacteristicValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_u8(self) -> Option<u8> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }
}

/// The host platform's representation of one box module.
///
/// The UUID is the module's own; it is the registry key and the handle
/// every characteristic operation addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accessory {
    pub uuid: Uuid,
    /// Module name after the configured replacement rules.
    pub display_name: String,
    pub kind: AccessoryKind,
    /// Flipped on discovery; accessories are never removed.
    pub reachable: bool,
    /// Momentary scene trigger (module carries a run URI).
    pub is_scene: bool,
    /// Last brightness written through the bridge. `None` until the
    /// host first sets one.
    pub brightness: Option<u8>,
}

impl Accessory {
    /// A freshly discovered accessory: reachable, not a scene, no
    /// cached brightness.
    pub fn new(uuid: Uuid, display_name: impl Into<String>, kind: AccessoryKind) -> Self {
        Self {
            uuid,
            display_name: display_name.into(),
            kind,
            reachable: true,
            is_scene: false,
            brightness: None,
        }
    }
}
