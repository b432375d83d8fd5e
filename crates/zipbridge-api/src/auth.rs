// Box session authentication
//
// Cookie-based session: `GET user/init` sets the session cookie and
// returns a nonce, `GET user/login` presents a SHA-1 token derived from
// the nonce and password. Re-running `connect()` on an existing client
// refreshes the session -- the keep-alive path relies on this.

use secrecy::ExposeSecret;
use sha1::{Digest, Sha1};
use tracing::{debug, info};

use crate::client::ZipatoClient;
use crate::error::Error;
use crate::models::{BoxInfo, InitResponse, StatusResponse};

impl ZipatoClient {
    /// Open (or refresh) a session with the box.
    ///
    /// Initializes the session cookie, logs in with the nonce token,
    /// and fetches the box identity for logging. Safe to call on a
    /// live session; the box simply issues a fresh nonce.
    pub async fn connect(&self) -> Result<BoxInfo, Error> {
        let init: InitResponse = self.get(self.api_url("user/init")?).await?;
        if !init.success {
            return Err(Error::Api {
                message: init.error.unwrap_or_else(|| "user/init failed".into()),
            });
        }
        let nonce = init.nonce.ok_or_else(|| Error::Api {
            message: "user/init response carried no nonce".into(),
        })?;

        let token = login_token(&nonce, self.password().expose_secret());

        let mut login_url = self.api_url("user/login")?;
        login_url
            .query_pairs_mut()
            .append_pair("username", self.username())
            .append_pair("token", &token);

        let login: StatusResponse = self.get(login_url).await?;
        if login.success != Some(true) {
            return Err(Error::Authentication {
                message: login.error.unwrap_or_else(|| "login rejected".into()),
            });
        }
        debug!("login successful");

        let info: BoxInfo = self.get(self.api_url("box")?).await?;
        info!(
            name = info.name.as_deref().unwrap_or("<unnamed>"),
            serial = info.serial.as_deref().unwrap_or("<unknown>"),
            firmware = info.firmware_version.as_deref().unwrap_or("<unknown>"),
            "connected to box"
        );

        if self.options().check_for_updates {
            match info.firmware_upgrade_available {
                Some(true) => info!("box reports a firmware upgrade is available"),
                Some(false) => debug!("box firmware is up to date"),
                None => debug!("box did not report firmware upgrade status"),
            }
        }

        Ok(info)
    }

    /// End the current session. Best-effort; the box expires sessions
    /// on its own anyway.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("user/logout")?;
        debug!("logging out at {}", url);
        self.get_ack(url).await?;
        debug!("logout complete");
        Ok(())
    }
}

/// Derive the login token from the init nonce and the account password:
/// `sha1_hex(nonce + sha1_hex(password))`.
fn login_token(nonce: &str, password: &str) -> String {
    let password_hash = hex::encode(Sha1::digest(password.as_bytes()));
    let mut outer = Sha1::new();
    outer.update(nonce.as_bytes());
    outer.update(password_hash.as_bytes());
    hex::encode(outer.finalize())
}
