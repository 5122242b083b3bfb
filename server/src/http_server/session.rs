//! Request-scoped session state.
//!
//! Everything lives in the private (encrypted and authenticated) cookie jar:
//! the `logged_in` admin flag and a one-shot flash message.

use axum::{extract::FromRequestParts, http::request::Parts};
use color_eyre::eyre::eyre;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

use super::{cookies::CookieKey, ServerError};
use crate::AppState;

const LOGGED_IN_COOKIE: &str = "logged_in";
const FLASH_COOKIE: &str = "flash";

#[derive(Clone)]
pub(crate) struct Session {
    cookies: Cookies,
    key: CookieKey,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.cookies
            .private(&self.key)
            .get(LOGGED_IN_COOKIE)
            .is_some_and(|c| c.value() == "true")
    }

    pub fn log_in(&self) {
        self.cookies
            .private(&self.key)
            .add(session_cookie(LOGGED_IN_COOKIE, "true".to_string()));
    }

    pub fn log_out(&self) {
        self.cookies
            .private(&self.key)
            .remove(session_cookie(LOGGED_IN_COOKIE, String::new()));
    }

    pub fn set_flash(&self, message: impl Into<String>) {
        self.cookies
            .private(&self.key)
            .add(session_cookie(FLASH_COOKIE, message.into()));
    }

    /// Returns the pending flash message and clears it.
    pub fn take_flash(&self) -> Option<String> {
        let private = self.cookies.private(&self.key);
        let flash = private.get(FLASH_COOKIE)?;
        private.remove(session_cookie(FLASH_COOKIE, String::new()));

        Some(flash.value().to_string())
    }
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .into()
}

impl FromRequestParts<AppState> for Session {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| {
                tracing::error!("Failed to get cookies: {msg}");

                ServerError(eyre!(msg), status)
            })?;

        Ok(Self {
            cookies,
            key: state.cookie_key.clone(),
        })
    }
}

/// A session that has logged in. Extracting it rejects anyone else with a
/// 401 before the handler runs.
pub(crate) struct AdminSession {
    pub session: Session,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;

        if session.is_admin() {
            Ok(Self { session })
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected request without admin session");

            Err(ServerError::unauthorized())
        }
    }
}
