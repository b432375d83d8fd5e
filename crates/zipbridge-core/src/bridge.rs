// ── Bridge facade ──
//
// Full lifecycle management for one box connection: session login,
// module enumeration and classification, accessory registration with
// the injected platform, characteristic command routing, and the
// session keep-alive. All background work runs under cancellation
// tokens owned by the bridge -- shutdown stops everything.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use zipbridge_api::models::{ATTR_METER, ATTR_SLIDER, ATTR_SWITCH};
use zipbridge_api::transport::TransportConfig;
use zipbridge_api::ZipatoClient;

use crate::classify::classify;
use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::BridgeConfig;
use crate::error::CoreError;
use crate::model::{Accessory, AccessoryKind, Characteristic, CharacteristicValue};
use crate::naming::apply_replacements;
use crate::platform::Platform;
use crate::store::{AccessoryRegistry, Discovered};

const COMMAND_CHANNEL_SIZE: usize = 64;

/// Delay before a triggered scene is pushed back to off, modeling the
/// momentary nature of scene switches.
const SCENE_RESET_DELAY: Duration = Duration::from_millis(500);

/// Brightness written when a light turns on with no usable cached level.
const DEFAULT_BRIGHTNESS: u8 = 100;

// ── ConnectionState ──────────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Bridge ───────────────────────────────────────────────────────────

/// The main entry point for hosting a box as smart-home accessories.
///
/// Cheaply cloneable via `Arc<BridgeInner>`. The platform handle is
/// injected at construction and travels with the bridge.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    config: BridgeConfig,
    platform: Arc<dyn Platform>,
    registry: AccessoryRegistry,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    /// Cancelled on `shutdown()`; parent of every per-connection token.
    cancel: CancellationToken,
    /// Child token for the current connection -- replaced on reconnect
    /// so a stale keep-alive never outlives its session.
    cancel_child: Mutex<CancellationToken>,
    client: Mutex<Option<Arc<ZipatoClient>>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Bridge {
    /// Create a new bridge from configuration and a platform handle.
    /// Does NOT connect -- call [`connect()`](Self::connect) once the
    /// host signals it is ready.
    pub fn new(config: BridgeConfig, platform: Arc<dyn Platform>) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(BridgeInner {
                config,
                platform,
                registry: AccessoryRegistry::new(),
                connection_state,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                client: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the bridge configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// Access the accessory registry.
    pub fn registry(&self) -> &AccessoryRegistry {
        &self.inner.registry
    }

    /// Observe connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Host lifecycle ───────────────────────────────────────────────

    /// Insert an accessory restored from the host platform's cache.
    ///
    /// Restored accessories start unreachable until discovery confirms
    /// the box still has the module.
    pub fn restore_accessory(&self, accessory: Accessory) {
        debug!(
            uuid = %accessory.uuid,
            name = %accessory.display_name,
            "restoring cached accessory"
        );
        self.inner.registry.restore(accessory);
    }

    /// Connect to the box and expose its modules.
    ///
    /// Opens the session, enumerates and classifies modules, registers
    /// accessories with the platform, then spawns the keep-alive and
    /// command-processing background tasks. Safe to call again after a
    /// connection loss; the previous connection's keep-alive is
    /// cancelled first.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        match self.connect_inner().await {
            Ok(()) => {
                let _ = self.inner.connection_state.send(ConnectionState::Connected);
                Ok(())
            }
            Err(e) => {
                let _ = self.inner.connection_state.send(ConnectionState::Failed);
                Err(e)
            }
        }
    }

    async fn connect_inner(&self) -> Result<(), CoreError> {
        // Fresh child token for this connection; stop the previous
        // connection's keep-alive if we are reconnecting.
        let child = self.inner.cancel.child_token();
        {
            let mut guard = self.inner.cancel_child.lock().await;
            let previous = std::mem::replace(&mut *guard, child.clone());
            previous.cancel();
        }

        let config = &self.inner.config;
        let transport = TransportConfig {
            timeout: config.timeout,
            cookie_jar: None,
        };

        let client = Arc::new(ZipatoClient::new(
            &config.address,
            config.credentials.username.clone(),
            config.credentials.password.clone(),
            config.hub_options,
            &transport,
        )?);

        client.connect().await?;
        *self.inner.client.lock().await = Some(Arc::clone(&client));

        self.discover().await?;

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(keep_alive_task(
            self.clone(),
            config.keep_alive,
            child,
        )));

        // The command processor lives for the whole bridge lifetime and
        // survives reconnects; only the first connect spawns it.
        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            handles.push(tokio::spawn(command_processor_task(
                self.clone(),
                rx,
                self.inner.cancel.clone(),
            )));
        }

        Ok(())
    }

    /// Enumerate the box and reconcile the accessory registry.
    ///
    /// Device-by-device, module-by-module: apply the allow-list and
    /// skip-list, classify, then either create a new accessory or mark
    /// the existing one reachable. Newly created accessories are
    /// announced to the platform in one batch.
    pub async fn discover(&self) -> Result<(), CoreError> {
        let client = self.client().await?;
        let devices = client.load_devices().await?;

        let selection = &self.inner.config.selection;
        let mut created: Vec<Accessory> = Vec::new();

        for device in &devices {
            if !selection.device_allowed(&device.name) {
                debug!(device = %device.name, "skipping device not on allow-list");
                continue;
            }

            for module in &device.modules {
                if selection.module_skipped(&module.name) {
                    debug!(module = %module.name, "skipping filtered module");
                    continue;
                }

                let Some(kind) = classify(&device.name, module) else {
                    continue;
                };

                let display_name = apply_replacements(&module.name, &self.inner.config.replace);
                match self.inner.registry.upsert_discovered(
                    module.uuid,
                    display_name,
                    kind,
                    module.is_scene(),
                ) {
                    Discovered::Created(accessory) => {
                        info!(
                            uuid = %accessory.uuid,
                            name = %accessory.display_name,
                            kind = %accessory.kind,
                            "discovered new accessory"
                        );
                        created.push((*accessory).clone());
                    }
                    Discovered::Updated(accessory) => {
                        debug!(
                            uuid = %accessory.uuid,
                            name = %accessory.display_name,
                            "accessory reachable again"
                        );
                        self.inner
                            .platform
                            .update_reachability(accessory.uuid, true)
                            .await;
                    }
                }
            }
        }

        if !created.is_empty() {
            info!(count = created.len(), "registering new accessories");
            self.inner.platform.register_accessories(&created).await?;
        }

        Ok(())
    }

    /// Submit a characteristic command and await its result.
    ///
    /// Commands are processed once [`connect()`](Self::connect) has
    /// completed; errors from the box come back verbatim in the reply.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command,
                response_tx,
            })
            .await
            .map_err(|_| CoreError::ChannelClosed)?;
        response_rx.await.map_err(|_| CoreError::ChannelClosed)?
    }

    /// Stop all background tasks and end the box session.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let handles: Vec<JoinHandle<()>> =
            std::mem::take(&mut *self.inner.task_handles.lock().await);
        for handle in handles {
            let _ = handle.await;
        }

        if let Some(client) = self.inner.client.lock().await.take() {
            if let Err(e) = client.logout().await {
                debug!(error = %e, "logout failed during shutdown");
            }
        }

        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        info!("bridge shut down");
    }

    // ── Command handling ─────────────────────────────────────────────

    async fn client(&self) -> Result<Arc<ZipatoClient>, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(CoreError::NotConnected)
    }

    fn accessory(&self, uuid: uuid::Uuid) -> Result<Arc<Accessory>, CoreError> {
        self.inner
            .registry
            .get(uuid)
            .ok_or(CoreError::UnknownAccessory { uuid })
    }

    async fn handle_command(&self, command: Command) -> Result<CommandResult, CoreError> {
        match command {
            Command::Read {
                uuid,
                characteristic,
            } => self.handle_read(uuid, characteristic).await,
            Command::Write {
                uuid,
                characteristic,
                value,
            } => self.handle_write(uuid, characteristic, value).await,
            Command::Identify { uuid } => {
                let accessory = self.accessory(uuid)?;
                info!(name = %accessory.display_name, "identify");
                Ok(CommandResult::Ok)
            }
        }
    }

    async fn handle_read(
        &self,
        uuid: uuid::Uuid,
        characteristic: Characteristic,
    ) -> Result<CommandResult, CoreError> {
        let accessory = self.accessory(uuid)?;

        match (accessory.kind, characteristic) {
            (AccessoryKind::TemperatureSensor, Characteristic::CurrentTemperature) => {
                debug!(name = %accessory.display_name, "reading temperature");
                let client = self.client().await?;
                let module = client
                    .module(uuid)
                    .ok_or(CoreError::ModuleNotFound { uuid })?;
                let value = module
                    .attribute(ATTR_METER)
                    .and_then(zipbridge_api::models::Attribute::value_as_f64)
                    .ok_or(CoreError::NoValue { uuid })?;
                Ok(CommandResult::Value(CharacteristicValue::Float(value)))
            }
            (AccessoryKind::Lightbulb, Characteristic::Brightness) => Ok(CommandResult::Value(
                CharacteristicValue::Int(accessory.brightness.unwrap_or(0)),
            )),
            (kind, characteristic) => Err(CoreError::UnsupportedCharacteristic {
                kind,
                characteristic,
            }),
        }
    }

    async fn handle_write(
        &self,
        uuid: uuid::Uuid,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<CommandResult, CoreError> {
        let accessory = self.accessory(uuid)?;

        match (accessory.kind, characteristic) {
            (AccessoryKind::Switch, Characteristic::On) => {
                let on = value.as_bool().ok_or(CoreError::InvalidValue {
                    characteristic,
                    expected: "bool",
                })?;
                if accessory.is_scene {
                    self.trigger_scene(&accessory, on).await
                } else {
                    let client = self.client().await?;
                    client.set_module_value(uuid, ATTR_SWITCH, json!(on)).await?;
                    Ok(CommandResult::Ok)
                }
            }
            (AccessoryKind::Lightbulb, Characteristic::On) => {
                let on = value.as_bool().ok_or(CoreError::InvalidValue {
                    characteristic,
                    expected: "bool",
                })?;
                let level = if on {
                    match accessory.brightness.filter(|&b| b > 0) {
                        Some(level) => level,
                        None => {
                            // Going all in: remember the default so later
                            // reads agree with what was written.
                            self.inner.registry.set_brightness(uuid, DEFAULT_BRIGHTNESS);
                            DEFAULT_BRIGHTNESS
                        }
                    }
                } else {
                    0
                };
                let client = self.client().await?;
                client
                    .set_module_value(uuid, ATTR_SLIDER, json!(level))
                    .await?;
                Ok(CommandResult::Ok)
            }
            (AccessoryKind::Lightbulb, Characteristic::Brightness) => {
                let level = value.as_u8().ok_or(CoreError::InvalidValue {
                    characteristic,
                    expected: "brightness percent 0-100",
                })?;
                let client = self.client().await?;
                client
                    .set_module_value(uuid, ATTR_SLIDER, json!(level))
                    .await?;
                self.inner.registry.set_brightness(uuid, level);
                Ok(CommandResult::Ok)
            }
            (kind, characteristic) => Err(CoreError::UnsupportedCharacteristic {
                kind,
                characteristic,
            }),
        }
    }

    /// Trigger a scene switch. Turning a scene off is a no-op success;
    /// turning it on runs the scene and schedules the automatic reset
    /// that pushes the switch back off.
    async fn trigger_scene(
        &self,
        accessory: &Accessory,
        on: bool,
    ) -> Result<CommandResult, CoreError> {
        if !on {
            return Ok(CommandResult::Ok);
        }

        let client = self.client().await?;
        client.run_scene(accessory.uuid).await?;
        info!(name = %accessory.display_name, "scene triggered");

        let bridge = self.clone();
        let uuid = accessory.uuid;
        let cancel = self.inner.cancel_child.lock().await.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(SCENE_RESET_DELAY) => {
                    bridge
                        .inner
                        .platform
                        .push_characteristic(
                            uuid,
                            Characteristic::On,
                            CharacteristicValue::Bool(false),
                        )
                        .await;
                }
            }
        });

        Ok(CommandResult::Ok)
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn command_processor_task(
    bridge: Bridge,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = bridge.handle_command(envelope.command).await;
                if let Err(ref e) = result {
                    debug!(error = %e, "command failed");
                }
                let _ = envelope.response_tx.send(result);
            }
        }
    }
    debug!("command processor stopped");
}

/// Periodically re-run the session login so the box keeps the session
/// alive. Failures are logged and retried on the next tick.
async fn keep_alive_task(bridge: Bridge, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let client = {
                    let guard = bridge.inner.client.lock().await;
                    match &*guard {
                        Some(c) => Arc::clone(c),
                        None => break,
                    }
                };
                match client.connect().await {
                    Ok(_) => debug!("keep-alive session refresh succeeded"),
                    Err(e) => warn!(error = %e, "keep-alive session refresh failed"),
                }
            }
        }
    }
    debug!("keep-alive stopped");
}
