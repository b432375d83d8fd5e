// ── Core error types ──
//
// Bridge-facing errors. Hub write failures are forwarded verbatim to the
// host platform through command replies -- the `From<zipbridge_api::Error>`
// impl wraps them without reinterpreting, per the adapter's pass-through
// error contract.

use thiserror::Error;
use uuid::Uuid;

use crate::model::{AccessoryKind, Characteristic};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to the box: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Bridge is not connected to the box")]
    NotConnected,

    // ── Accessory errors ─────────────────────────────────────────────
    #[error("No accessory registered for UUID {uuid}")]
    UnknownAccessory { uuid: Uuid },

    #[error("No box module cached for UUID {uuid}")]
    ModuleNotFound { uuid: Uuid },

    #[error("{kind} accessories do not serve {characteristic}")]
    UnsupportedCharacteristic {
        kind: AccessoryKind,
        characteristic: Characteristic,
    },

    #[error("Invalid value for {characteristic}: expected {expected}")]
    InvalidValue {
        characteristic: Characteristic,
        expected: &'static str,
    },

    #[error("Module {uuid} has no readable value")]
    NoValue { uuid: Uuid },

    // ── Hub errors (forwarded verbatim) ──────────────────────────────
    #[error("Box error: {message}")]
    Hub { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Command channel closed")]
    ChannelClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from hub-client errors ────────────────────────────────

impl From<zipbridge_api::Error> for CoreError {
    fn from(err: zipbridge_api::Error) -> Self {
        match err {
            zipbridge_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            zipbridge_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Hub {
                        message: e.to_string(),
                    }
                }
            }
            zipbridge_api::Error::InvalidUrl(e) => CoreError::Internal(format!("invalid URL: {e}")),
            zipbridge_api::Error::ModuleNotFound { uuid } => CoreError::ModuleNotFound { uuid },
            zipbridge_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
            other => CoreError::Hub {
                message: other.to_string(),
            },
        }
    }
}
