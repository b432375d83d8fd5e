// ── Domain model ──

mod accessory;

pub use accessory::{Accessory, AccessoryKind, Characteristic, CharacteristicValue};
