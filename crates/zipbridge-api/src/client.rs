// Box API HTTP client
//
// Wraps `reqwest::Client` with box-specific URL construction and status
// envelope handling. Session setup lives in `auth.rs`, device/module
// endpoints in `devices.rs` -- both as inherent methods, keeping this
// module focused on transport mechanics.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::RwLock;

use reqwest::StatusCode;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;
use uuid::Uuid;

use crate::error::Error;
use crate::models::{Module, StatusResponse};
use crate::transport::TransportConfig;

/// Base URL of the cloud-relayed box API.
const CLOUD_BASE_URL: &str = "https://my.zipato.com/zipato-web/v2/";

/// Port the box serves its API on when reached over the LAN.
const LOCAL_API_PORT: u16 = 8080;

/// Where to reach the box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubAddress {
    /// Via the vendor cloud relay (default).
    Cloud,
    /// Directly on the LAN at the given address.
    Local(IpAddr),
    /// An explicit API base URL (nonstandard deployments, tests).
    Custom(Url),
}

impl HubAddress {
    /// The API base URL for this address.
    pub fn base_url(&self) -> Url {
        match self {
            Self::Cloud => Url::parse(CLOUD_BASE_URL).expect("cloud base URL is valid"),
            Self::Local(ip) => {
                let raw = format!("http://{ip}:{LOCAL_API_PORT}/zipato-web/v2/");
                Url::parse(&raw).expect("local base URL is valid")
            }
            Self::Custom(url) => url.clone(),
        }
    }
}

/// Client behavior flags, mirroring the box API's configuration
/// surface: payload logging verbosity and the automatic firmware
/// update check after login.
#[derive(Debug, Clone, Copy, Default)]
pub struct HubOptions {
    /// Log response payloads at debug level.
    pub verbose: bool,
    /// After login, report whether the box has a firmware upgrade pending.
    pub check_for_updates: bool,
}

/// HTTP client for the box session API.
///
/// Holds the credentials so the session can be re-opened at any time
/// (the keep-alive path), and caches every module seen during
/// enumeration so value reads and attribute-UUID resolution never hit
/// the network.
pub struct ZipatoClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    options: HubOptions,
    /// Module cache, keyed by module UUID. Filled by `load_devices`.
    modules: RwLock<HashMap<Uuid, Module>>,
}

impl ZipatoClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// A cookie jar is always attached (the session rides on a cookie).
    pub fn new(
        address: &HubAddress,
        username: impl Into<String>,
        password: SecretString,
        options: HubOptions,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url: address.base_url(),
            username: username.into(),
            password,
            options,
            modules: RwLock::new(HashMap::new()),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and explicit
    /// base URL. Used by tests to point at a mock server.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
        options: HubOptions,
    ) -> Self {
        Self {
            http,
            base_url,
            username: username.into(),
            password,
            options,
            modules: RwLock::new(HashMap::new()),
        }
    }

    /// The configured username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The configured password.
    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// The client behavior flags.
    pub fn options(&self) -> HubOptions {
        self.options
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Module cache ─────────────────────────────────────────────────

    /// Fetch a module from the enumeration cache.
    pub fn module(&self, uuid: Uuid) -> Option<Module> {
        self.modules
            .read()
            .expect("module cache lock poisoned")
            .get(&uuid)
            .cloned()
    }

    /// Number of cached modules.
    pub fn cached_module_count(&self) -> usize {
        self.modules
            .read()
            .expect("module cache lock poisoned")
            .len()
    }

    pub(crate) fn cache_module(&self, module: Module) {
        self.modules
            .write()
            .expect("module cache lock poisoned")
            .insert(module.uuid, module);
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path relative to the base
    /// (e.g. `user/init`, `scenes/{uuid}/run`).
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and deserialize the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        self.parse_body(resp).await
    }

    /// Send a GET request where only the acknowledgement matters
    /// (scene runs). Tolerates an empty body.
    pub(crate) async fn get_ack(&self, url: Url) -> Result<(), Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        self.check_status(resp).await
    }

    /// Send a PUT request with a JSON body, expecting no meaningful
    /// response payload. The box answers writes with 2xx and an empty
    /// or status body.
    pub(crate) async fn put(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.check_status(resp).await
    }

    /// Deserialize a response body, mapping HTTP and shape failures to
    /// typed errors with a body preview for debugging.
    async fn parse_body<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("session expired or invalid credentials (HTTP {status})"),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if self.options.verbose {
            debug!(body = %body, "response payload");
        } else {
            trace!(body = %body, "response payload");
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// Check a write response: 2xx is success, and a `success: false`
    /// status body on 2xx is still an error (the box does this on some
    /// firmwares).
    async fn check_status(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("session expired or invalid credentials (HTTP {status})"),
            });
        }

        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Error::Api {
                message: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        if let Ok(status_body) = serde_json::from_str::<StatusResponse>(&body) {
            if status_body.failed() {
                return Err(Error::Api {
                    message: status_body
                        .error
                        .unwrap_or_else(|| "box reported failure".into()),
                });
            }
        }

        Ok(())
    }
}

/// First 200 characters of a body, for error messages.
fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
