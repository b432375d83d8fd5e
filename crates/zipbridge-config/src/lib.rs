//! Configuration for the zipbridge daemon.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `zipbridge_core::BridgeConfig`. The daemon binary
//! depends on this crate; core never reads config files.

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use zipbridge_api::{HubAddress, HubOptions};
use zipbridge_core::{BridgeConfig, HubCredentials, ReplaceRule, Selection};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' in {path}")]
    NoProfile { profile: String, path: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named box profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Session refresh cadence in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u64,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            keep_alive: default_keep_alive(),
            timeout: default_timeout(),
        }
    }
}

fn default_keep_alive() -> u64 {
    15 * 60
}
fn default_timeout() -> u64 {
    30
}

/// A named box profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Box account username.
    pub username: Option<String>,

    /// Box account password (plaintext — prefer keyring or env var).
    pub password: Option<String>,

    /// LAN address of the box. When absent the cloud relay is used.
    pub localip: Option<IpAddr>,

    /// Device (group) allow-list. Absent admits every device.
    pub devices: Option<Vec<String>>,

    /// Module skip-list by name.
    #[serde(default)]
    pub filters: Vec<String>,

    /// Ordered display-name replacement rules.
    #[serde(default)]
    pub replace: Vec<ReplaceRule>,

    /// Override the session refresh cadence (seconds).
    pub keep_alive: Option<u64>,

    /// Override the request timeout (seconds).
    pub timeout: Option<u64>,

    /// Log hub payloads at debug level.
    #[serde(default)]
    pub verbose: bool,

    /// Report pending box firmware upgrades after login.
    #[serde(default)]
    pub check_for_updates: bool,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "zipbridge", "zipbridge").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("zipbridge");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full `Config` from a file + environment.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ZIPATO_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the `Config` from the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

/// The profile to use: explicit choice, else the configured default,
/// else `"default"`.
pub fn active_profile_name(explicit: Option<&str>, cfg: &Config) -> String {
    explicit
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve box credentials for a profile.
///
/// Username: profile, then `ZIPATO_USERNAME`. Password: `ZIPATO_PASSWORD`,
/// then the system keyring, then plaintext in the profile.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<HubCredentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("ZIPATO_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("ZIPATO_PASSWORD") {
        return Ok(HubCredentials {
            username,
            password: SecretString::from(pw),
        });
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("zipbridge", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(HubCredentials {
                username,
                password: SecretString::from(pw),
            });
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(HubCredentials {
            username,
            password: SecretString::from(pw.clone()),
        });
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Profile conversion ──────────────────────────────────────────────

/// Build a `BridgeConfig` from a profile.
pub fn profile_to_bridge_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<BridgeConfig, ConfigError> {
    let credentials = resolve_credentials(profile, profile_name)?;

    let address = match profile.localip {
        Some(ip) => HubAddress::Local(ip),
        None => HubAddress::Cloud,
    };

    Ok(BridgeConfig {
        address,
        credentials,
        selection: Selection {
            devices: profile.devices.clone(),
            filters: profile.filters.clone(),
        },
        replace: profile.replace.clone(),
        keep_alive: Duration::from_secs(profile.keep_alive.unwrap_or(defaults.keep_alive)),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        hub_options: HubOptions {
            verbose: profile.verbose,
            check_for_updates: profile.check_for_updates,
        },
    })
}
