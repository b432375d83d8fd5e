// ── Command API ──
//
// Characteristic operations from the host platform flow through a
// unified `Command` enum with a oneshot reply, routed over an `mpsc`
// channel to the bridge's command processor. This is the host→bridge
// half of the accessory get/set wiring.

use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{Characteristic, CharacteristicValue};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// A characteristic operation against a registered accessory.
#[derive(Debug, Clone)]
pub enum Command {
    /// Host `get` callback: read a characteristic value.
    Read {
        uuid: Uuid,
        characteristic: Characteristic,
    },
    /// Host `set` callback: write a characteristic value.
    Write {
        uuid: Uuid,
        characteristic: Characteristic,
        value: CharacteristicValue,
    },
    /// Host `identify` callback. Logged only.
    Identify { uuid: Uuid },
}

/// Result of a command execution.
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Ok,
    Value(CharacteristicValue),
}
