use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{NewResource, NewSubject, Resource, Subject};

/// Write side of the course catalog used by the bulk importer.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Creates one subject and returns it with its generated id.
    async fn insert_subject(&self, subject: NewSubject) -> Result<Subject, AppError>;

    /// Creates a batch of resources in a single call.
    async fn insert_resources(&self, resources: Vec<NewResource>) -> Result<Vec<Resource>, AppError>;
}

pub struct SqliteCatalogStore {
    db: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn insert_subject(&self, subject: NewSubject) -> Result<Subject, AppError> {
        Ok(repository::insert_subject(&self.db, subject).await?)
    }

    async fn insert_resources(&self, resources: Vec<NewResource>) -> Result<Vec<Resource>, AppError> {
        Ok(repository::insert_resources(&self.db, resources).await?)
    }
}
