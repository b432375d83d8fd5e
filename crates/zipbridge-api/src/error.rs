use thiserror::Error;

/// Top-level error type for the `zipbridge-api` crate.
///
/// Covers every failure mode of the box session API: authentication,
/// transport, hub-reported errors, and cache misses on module lookups.
/// `zipbridge-core` maps these into bridge-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, expired nonce, locked account).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Box API ─────────────────────────────────────────────────────
    /// Error reported by the box (`success: false` or a non-2xx status).
    #[error("Box API error: {message}")]
    Api { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Module cache ────────────────────────────────────────────────
    /// No module with this UUID in the enumeration cache.
    #[error("Module not found: {uuid}")]
    ModuleNotFound { uuid: uuid::Uuid },

    /// The module has no attribute with the requested code.
    #[error("Module {uuid} has no attribute with code {code}")]
    AttributeNotFound { uuid: uuid::Uuid, code: u16 },

    /// The attribute exists but carries no UUID of its own, so it
    /// cannot be addressed for a write.
    #[error("Attribute {code} of module {uuid} is not writable")]
    NotWritable { uuid: uuid::Uuid, code: u16 },
}

impl Error {
    /// Returns `true` if this error indicates the session has expired
    /// and a fresh `connect()` might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::UNAUTHORIZED),
            _ => false,
        }
    }
}
