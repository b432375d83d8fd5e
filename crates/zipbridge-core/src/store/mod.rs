// ── Accessory storage ──

mod registry;

pub use registry::{AccessoryRegistry, Discovered};
