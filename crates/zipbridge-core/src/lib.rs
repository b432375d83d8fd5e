//! Bridge layer between the box API (`zipbridge-api`) and a smart-home
//! host platform.
//!
//! This crate owns the domain model and lifecycle logic of the bridge:
//!
//! - **[`Bridge`]** — Central facade managing the full lifecycle:
//!   [`connect()`](Bridge::connect) opens the box session, enumerates and
//!   classifies modules, registers accessories with the injected
//!   [`Platform`], then spawns the keep-alive and command-processing
//!   background tasks. [`shutdown()`](Bridge::shutdown) cancels them.
//!
//! - **[`AccessoryRegistry`]** — Concurrent accessory storage keyed by
//!   module UUID with `watch`-broadcast snapshots. Guarantees one accessory
//!   per UUID: re-discovery flips reachability instead of duplicating.
//!
//! - **[`classify`]** — The ordered rule table mapping box modules onto
//!   accessory kinds, plus the device allow-list / module skip-list.
//!
//! - **[`Command`]** — Typed characteristic reads/writes routed through an
//!   `mpsc` channel to the bridge's command processor, each carrying a
//!   oneshot reply. This is the host→bridge direction of the get/set wiring.
//!
//! - **[`Platform`]** — The consumed host-platform seam (accessory
//!   registration, reachability updates, bridge-initiated state pushes),
//!   injected at construction.

pub mod bridge;
pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod naming;
pub mod platform;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bridge::{Bridge, ConnectionState};
pub use classify::{Selection, classify};
pub use command::{Command, CommandResult};
pub use config::{BridgeConfig, HubCredentials};
pub use error::CoreError;
pub use model::{Accessory, AccessoryKind, Characteristic, CharacteristicValue};
pub use naming::ReplaceRule;
pub use platform::Platform;
pub use store::{AccessoryRegistry, Discovered};
