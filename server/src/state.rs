use chrono_tz::Tz;
use color_eyre::eyre::{eyre, Context};
use db::{setup_db_pool, SqlitePool};
use tracing::instrument;

use crate::{auth::AdminCredentials, http_server::cookies::CookieKey};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub display_timezone: Tz,
}

impl AppConfig {
    #[instrument(name = "AppConfig::from_env")]
    pub fn from_env() -> color_eyre::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| db::DEFAULT_DATABASE_URL.to_string());

        let port = std::env::var("PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .wrap_err("Invalid PORT, expected a port number")?
            .unwrap_or(3000);

        let display_timezone = match std::env::var("DISPLAY_TIMEZONE") {
            Ok(tz) => tz
                .parse::<Tz>()
                .map_err(|e| eyre!("Invalid DISPLAY_TIMEZONE {tz}: {e}"))?,
            Err(_) => Tz::UTC,
        };

        Ok(Self {
            database_url,
            port,
            display_timezone,
        })
    }

    pub async fn connect_db(&self) -> color_eyre::Result<SqlitePool> {
        setup_db_pool(&self.database_url).await
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub app: AppConfig,
    pub admin: AdminCredentials,
    pub db: SqlitePool,
    pub cookie_key: CookieKey,
}

impl AppState {
    #[instrument(name = "AppState::from_env", err)]
    pub async fn from_env() -> color_eyre::Result<Self> {
        let app = AppConfig::from_env()?;
        let db = app.connect_db().await?;

        Ok(AppState {
            admin: AdminCredentials::from_env()?,
            cookie_key: CookieKey::from_env_or_generate()?,
            app,
            db,
        })
    }
}
