use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectOptions;

use crate::prelude::*;

pub struct Config {
  pub port: u16,
  /// Store accesses carry no timeout budget from their callers; keep a
  /// conservative few seconds at the connection level.
  pub connect_timeout: Duration,
}

impl Config {
  pub fn from_env() -> Self {
    let port =
      std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);

    let connect_timeout = std::env::var("DB_CONNECT_TIMEOUT_SECS")
      .ok()
      .and_then(|v| v.parse().ok())
      .map(Duration::from_secs)
      .unwrap_or(Duration::from_secs(5));

    Self { port, connect_timeout }
  }
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(db_url: &str) -> anyhow::Result<Self> {
    let config = Config::from_env();

    let mut options = ConnectOptions::new(db_url.to_string());
    options.connect_timeout(config.connect_timeout);

    let db = Database::connect(options)
      .await
      .context("Failed to connect to database")?;

    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self { db, config })
  }
}
