use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::{CatalogStore, SqliteCatalogStore};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub catalog: Arc<dyn CatalogStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            catalog: Arc::new(SqliteCatalogStore::new(db.clone())),
            db,
            config: Arc::new(config),
        }
    }
}
