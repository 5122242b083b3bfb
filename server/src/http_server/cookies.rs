use std::{fmt::Debug, ops::Deref};

use base64::Engine;
use color_eyre::eyre::{eyre, Context};

/// Key for the private cookie jar that carries the session.
///
/// `COOKIE_KEY` is base64 encoded key material. Without it a fresh key is
/// generated, which logs everyone out on restart.
#[derive(Clone)]
pub struct CookieKey(pub tower_cookies::Key);

impl Deref for CookieKey {
    type Target = tower_cookies::Key;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl CookieKey {
    pub fn from_env_or_generate() -> color_eyre::Result<Self> {
        let cookie_key = std::env::var("COOKIE_KEY");
        let cookie_key = if let Ok(cookie_key) = cookie_key {
            let cookie_key = base64::engine::general_purpose::STANDARD
                .decode(cookie_key.as_bytes())
                .wrap_err("COOKIE_KEY must be base64 encoded")?;
            if cookie_key.len() < 32 {
                return Err(eyre!("COOKIE_KEY must decode to at least 32 bytes"));
            }

            tower_cookies::Key::derive_from(&cookie_key)
        } else {
            tracing::warn!("COOKIE_KEY not set, generating a new cookie key");
            tower_cookies::Key::generate()
        };
        Ok(Self(cookie_key))
    }
}

impl Debug for CookieKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieKey")
            .field("value", &"[omitted]")
            .finish()
    }
}
