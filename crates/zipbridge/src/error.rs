//! Daemon error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use zipbridge_config::ConfigError;
use zipbridge_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum DaemonError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(zipbridge::profile_not_found),
        help("Add a [profiles.{name}] section to {path}")
    )]
    ProfileNotFound { name: String, path: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(zipbridge::no_credentials),
        help(
            "Set username/password in the profile, store the password in the\n\
             system keyring, or export ZIPATO_USERNAME / ZIPATO_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(zipbridge::config))]
    Config(String),

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the box")]
    #[diagnostic(
        code(zipbridge::connection_failed),
        help(
            "Check that the box is online and, when using localip,\n\
             reachable on your LAN. Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Authentication with the box failed: {message}")]
    #[diagnostic(
        code(zipbridge::auth_failed),
        help("Verify the account credentials for this box.")
    )]
    AuthFailed { message: String },

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("Bridge error: {message}")]
    #[diagnostic(code(zipbridge::bridge))]
    Bridge { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DaemonError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ProfileNotFound { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for DaemonError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => Self::ConnectionFailed { reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            other => Self::Bridge {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for DaemonError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            other => Self::Config(other.to_string()),
        }
    }
}
