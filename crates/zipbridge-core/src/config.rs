// ── Runtime bridge configuration ──
//
// These types describe *how* to reach the box and which modules to
// expose. They carry credential data and connection tuning, but never
// touch disk -- the daemon constructs a `BridgeConfig` from its config
// layer and hands it in.

use std::time::Duration;

use secrecy::SecretString;

use zipbridge_api::{HubAddress, HubOptions};

use crate::classify::Selection;
use crate::naming::ReplaceRule;

/// Box account credentials.
#[derive(Debug, Clone)]
pub struct HubCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Configuration for running one bridge against one box.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Cloud relay or local LAN address.
    pub address: HubAddress,
    pub credentials: HubCredentials,
    /// Device allow-list and module skip-list.
    pub selection: Selection,
    /// Ordered display-name replacement rules.
    pub replace: Vec<ReplaceRule>,
    /// Session refresh cadence. The box expires idle sessions, so the
    /// bridge re-runs the login on this interval.
    pub keep_alive: Duration,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Hub client behavior flags (payload logging, update check).
    pub hub_options: HubOptions,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            address: HubAddress::Cloud,
            credentials: HubCredentials {
                username: String::new(),
                password: SecretString::from(String::new()),
            },
            selection: Selection::default(),
            replace: Vec::new(),
            keep_alive: Duration::from_secs(15 * 60),
            timeout: Duration::from_secs(30),
            hub_options: HubOptions::default(),
        }
    }
}
