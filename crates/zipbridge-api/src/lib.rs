// zipbridge-api: Async Rust client for the Zipato box session API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod auth;
mod devices;

pub use client::{HubAddress, HubOptions, ZipatoClient};
pub use error::Error;
