//! Admin Credential Repository
//!
//! 管理员凭证存储抽象：get / verify / update，可在测试中用内存数据库替换。

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Admin;
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ADMIN_TABLE: &str = "admin";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the single admin record
    pub async fn find(&self) -> RepoResult<Option<Admin>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin LIMIT 1")
            .await?;
        let admins: Vec<Admin> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Find admin by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let admins: Vec<Admin> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Seed the admin record at startup if absent.
    ///
    /// 已存在时返回现有记录，不覆盖密码。
    pub async fn ensure_seeded(&self, username: &str, password: &str) -> RepoResult<Admin> {
        if let Some(existing) = self.find().await? {
            return Ok(existing);
        }

        let hash_pass = Admin::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash seed password: {}", e)))?;

        let now = now_millis();
        let admin = Admin {
            id: None,
            username: username.to_string(),
            hash_pass,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Admin> = self.base.db().create(ADMIN_TABLE).content(admin).await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to seed admin".to_string()))?;

        tracing::info!(username = %created.username, "Admin credential seeded");
        Ok(created)
    }

    /// Overwrite the stored password hash
    pub async fn update_password(&self, id: &str, new_hash: &str) -> RepoResult<Admin> {
        let pure_id = strip_table_prefix(ADMIN_TABLE, id).to_string();
        let mut result = self
            .base
            .db()
            .query("UPDATE type::thing('admin', $id) SET hash_pass = $hash, updated_at = $now RETURN AFTER")
            .bind(("id", pure_id))
            .bind(("hash", new_hash.to_string()))
            .bind(("now", now_millis()))
            .await?;
        let admins: Vec<Admin> = result.take(0)?;

        admins
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Admin {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::engine::local::Mem;

    async fn test_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
        db.use_ns("test").use_db("test").await.expect("ns/db");
        db
    }

    #[tokio::test]
    async fn seed_verify_and_change_password() {
        let repo = AdminRepository::new(test_db().await);

        let seeded = repo.ensure_seeded("admin", "first-secret").await.unwrap();
        assert!(seeded.verify_password("first-secret").unwrap());
        assert!(!seeded.verify_password("wrong").unwrap());

        // 重复播种不覆盖已有凭证
        let again = repo.ensure_seeded("admin", "other-secret").await.unwrap();
        assert!(again.verify_password("first-secret").unwrap());

        let id = seeded.id.as_ref().unwrap().to_string();
        let new_hash = Admin::hash_password("second-secret").unwrap();
        let updated = repo.update_password(&id, &new_hash).await.unwrap();
        assert!(updated.verify_password("second-secret").unwrap());
        assert!(!updated.verify_password("first-secret").unwrap());
    }

    #[tokio::test]
    async fn find_by_username_matches_exactly() {
        let repo = AdminRepository::new(test_db().await);
        repo.ensure_seeded("admin", "secret").await.unwrap();

        assert!(repo.find_by_username("admin").await.unwrap().is_some());
        assert!(repo.find_by_username("Admin").await.unwrap().is_none());
    }
}
