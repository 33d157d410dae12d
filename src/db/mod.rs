pub mod auth;
pub mod content;
pub mod repository;
pub mod store;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::config::Config;

pub use store::{CatalogStore, SqliteCatalogStore};

/// Opens the configured database, creating the file if needed, and applies migrations.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    info!("Connecting to {}", config.database_url);

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database ready");
    Ok(pool)
}

/// Migrated in-memory database on a single connection, for tests and local tooling.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
