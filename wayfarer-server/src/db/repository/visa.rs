//! Visa Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Visa;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const VISA_TABLE: &str = "visa";

#[derive(Clone)]
pub struct VisaRepository {
    base: BaseRepository,
}

impl VisaRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all visa services, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Visa>> {
        let visas: Vec<Visa> = self
            .base
            .db()
            .query("SELECT * FROM visa ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(visas)
    }

    /// Find visa by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Visa>> {
        let pure_id = strip_table_prefix(VISA_TABLE, id);
        let visa: Option<Visa> = self.base.db().select((VISA_TABLE, pure_id)).await?;
        Ok(visa)
    }

    /// Create a new visa service
    pub async fn create(&self, data: Visa) -> RepoResult<Visa> {
        let created: Option<Visa> = self.base.db().create(VISA_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create visa".to_string()))
    }

    /// Replace an existing visa record
    pub async fn replace(&self, id: &str, mut data: Visa) -> RepoResult<Visa> {
        let pure_id = strip_table_prefix(VISA_TABLE, id);
        data.id = None;

        let updated: Option<Visa> = self
            .base
            .db()
            .update((VISA_TABLE, pure_id))
            .content(data)
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Visa {} not found", id)))
    }

    /// Delete a visa record
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(VISA_TABLE, id);
        let deleted: Option<Visa> = self.base.db().delete((VISA_TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }

    /// Count all visa services
    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count_table(VISA_TABLE).await
    }
}
