// ── Module classification ──
//
// Maps box modules onto accessory kinds via an explicit ordered rule
// table: first matching rule wins, no match means the module is skipped
// (logged, never fatal). Also hosts the device allow-list / module
// skip-list applied before classification.

use tracing::debug;

use zipbridge_api::models::{ATTR_METER, ATTR_SLIDER, ATTR_SWITCH, Module};

use crate::model::AccessoryKind;

/// Device group holding momentary scene triggers.
const SCENES_GROUP: &str = "scenes";
/// Device group holding meter modules.
const METERS_GROUP: &str = "meters";
/// Meter definition name the bridge exposes as a temperature sensor.
const TEMPERATURE_DEFINITION: &str = "TEMPERATURE";

/// One classification rule: a predicate over (device name, module) and
/// the accessory kind it yields.
struct Rule {
    name: &'static str,
    kind: AccessoryKind,
    matches: fn(&str, &Module) -> bool,
}

/// Ordered rule table, first match wins.
const RULES: &[Rule] = &[
    Rule {
        name: "slider attribute",
        kind: AccessoryKind::Lightbulb,
        matches: |_, module| module.attribute(ATTR_SLIDER).is_some(),
    },
    Rule {
        name: "scene group or switch attribute",
        kind: AccessoryKind::Switch,
        matches: |device, module| {
            device == SCENES_GROUP || module.attribute(ATTR_SWITCH).is_some()
        },
    },
    Rule {
        name: "temperature meter",
        kind: AccessoryKind::TemperatureSensor,
        matches: |device, module| {
            device == METERS_GROUP
                && module
                    .attribute(ATTR_METER)
                    .is_some_and(|a| a.definition_name() == Some(TEMPERATURE_DEFINITION))
        },
    },
];

/// Classify a module within its device group.
///
/// Returns `None` when no rule matches -- including modules without any
/// attributes, which the box reports for unconfigured endpoints.
pub fn classify(device_name: &str, module: &Module) -> Option<AccessoryKind> {
    for rule in RULES {
        if (rule.matches)(device_name, module) {
            debug!(
                module = %module.name,
                device = device_name,
                rule = rule.name,
                kind = %rule.kind,
                "classified module"
            );
            return Some(rule.kind);
        }
    }
    debug!(
        module = %module.name,
        device = device_name,
        "no classification rule matched, skipping module"
    );
    None
}

/// Which devices and modules participate in the bridge.
///
/// `devices` is an allow-list over device (group) names -- `None` admits
/// everything, an empty list admits nothing. `filters` is a skip-list
/// over module names, applied regardless of classification.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub devices: Option<Vec<String>>,
    pub filters: Vec<String>,
}

impl Selection {
    /// Whether a device group participates at all.
    pub fn device_allowed(&self, name: &str) -> bool {
        match &self.devices {
            Some(allowed) => allowed.iter().any(|d| d == name),
            None => true,
        }
    }

    /// Whether a module is excluded by name.
    pub fn module_skipped(&self, name: &str) -> bool {
        self.filters.iter().any(|f| f == name)
    }
}
