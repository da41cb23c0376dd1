use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::email::{LogNotifier, Notifier};
use crate::products::{NullFetcher, ProductFetcher};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub notifier: Arc<dyn Notifier>,
    pub fetcher: Arc<dyn ProductFetcher>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("connect to database")?;

        Ok(Self::from_parts(
            db,
            config,
            Arc::new(LogNotifier),
            Arc::new(NullFetcher),
        ))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        notifier: Arc<dyn Notifier>,
        fetcher: Arc<dyn ProductFetcher>,
    ) -> Self {
        Self {
            db,
            config,
            notifier,
            fetcher,
        }
    }
}
