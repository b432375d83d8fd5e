// Shared transport configuration for building reqwest::Client instances.
//
// The box speaks plain TLS on the cloud endpoint and plain HTTP on the
// local one, so the only knobs are the request timeout and the cookie
// jar that carries the session.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

/// Transport configuration for the hub HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// A cookie jar is required for session auth; if none was supplied
    /// one is created here.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let jar = self
            .cookie_jar
            .clone()
            .unwrap_or_else(|| Arc::new(Jar::default()));

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("zipbridge/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(jar)
            .build()?;
        Ok(client)
    }

    /// Create a config with a fresh cookie jar.
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }
}
