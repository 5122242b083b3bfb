use std::fmt::Debug;

use color_eyre::eyre::{eyre, Context, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::instrument;

type HmacSha256 = Hmac<Sha256>;

/// The single shared admin login.
///
/// The password is never held in plain text: `ADMIN_PASSWORD_HASH` is the hex
/// HMAC-SHA256 of the password keyed by the username, as printed by the
/// `hash-password` command.
#[derive(Clone)]
pub(crate) struct AdminCredentials {
    username: String,
    password_hash: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum LoginError {
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Invalid password")]
    InvalidPassword,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password_hash_hex: &str) -> Result<Self> {
        let password_hash = hex::decode(password_hash_hex.trim())
            .wrap_err("ADMIN_PASSWORD_HASH must be hex encoded")?;

        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    #[instrument(name = "AdminCredentials::from_env")]
    pub fn from_env() -> Result<Self> {
        let username =
            std::env::var("ADMIN_USERNAME").wrap_err("Missing ADMIN_USERNAME, needed for login")?;
        let password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .wrap_err("Missing ADMIN_PASSWORD_HASH, generate one with `server hash-password`")?;

        Self::new(username, &password_hash)
    }

    pub fn hash_password(username: &str, password: &str) -> Result<String> {
        let mut mac = keyed_mac(username)?;
        mac.update(password.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    pub fn check(&self, username: &str, password: &str) -> Result<(), LoginError> {
        if username != self.username {
            return Err(LoginError::InvalidUsername);
        }

        let Ok(mut mac) = keyed_mac(username) else {
            return Err(LoginError::InvalidPassword);
        };
        mac.update(password.as_bytes());

        mac.verify_slice(&self.password_hash)
            .map_err(|_| LoginError::InvalidPassword)
    }
}

fn keyed_mac(username: &str) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(username.as_bytes())
        .map_err(|e| eyre!("Failed to key the password hash: {e}"))
}

impl Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"[omitted]")
            .finish()
    }
}
