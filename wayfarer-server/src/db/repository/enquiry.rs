//! Enquiry Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Enquiry;
use crate::utils::time::month_of_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ENQUIRY_TABLE: &str = "enquiry";

#[derive(Clone)]
pub struct EnquiryRepository {
    base: BaseRepository,
}

impl EnquiryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all enquiries, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Enquiry>> {
        let enquiries: Vec<Enquiry> = self
            .base
            .db()
            .query("SELECT * FROM enquiry ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(enquiries)
    }

    /// Create a new enquiry (immutable after creation)
    pub async fn create(&self, data: Enquiry) -> RepoResult<Enquiry> {
        let created: Option<Enquiry> = self.base.db().create(ENQUIRY_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create enquiry".to_string()))
    }

    /// Count all enquiries
    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count_table(ENQUIRY_TABLE).await
    }

    /// Enquiry counts per calendar month (1-12), ignoring the year.
    pub async fn monthly_counts(&self) -> RepoResult<[i64; 12]> {
        #[derive(serde::Deserialize)]
        struct CreatedRow {
            created_at: i64,
        }

        let rows: Vec<CreatedRow> = self
            .base
            .db()
            .query("SELECT created_at FROM enquiry")
            .await?
            .take(0)?;

        let mut counts = [0i64; 12];
        for row in rows {
            let month = month_of_millis(row.created_at);
            counts[(month as usize).clamp(1, 12) - 1] += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use surrealdb::engine::local::Mem;

    async fn test_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
        db.use_ns("test").use_db("test").await.expect("ns/db");
        db
    }

    fn sample(year: i32, month: u32) -> Enquiry {
        let at = chrono::Utc
            .with_ymd_and_hms(year, month, 15, 9, 30, 0)
            .unwrap();
        Enquiry {
            id: None,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            subject: Some("Honeymoon packages".to_string()),
            message: "Looking for a 5-day trip".to_string(),
            created_at: at.timestamp_millis(),
        }
    }

    #[tokio::test]
    async fn monthly_counts_bucket_across_years() {
        let repo = EnquiryRepository::new(test_db().await);
        repo.create(sample(2024, 3)).await.unwrap();
        repo.create(sample(2025, 3)).await.unwrap();
        repo.create(sample(2025, 7)).await.unwrap();

        // 不同年份的 3 月合并进同一个桶
        let counts = repo.monthly_counts().await.unwrap();
        assert_eq!(counts[2], 2);
        assert_eq!(counts[6], 1);
        assert_eq!(counts.iter().sum::<i64>(), 3);
    }

    #[tokio::test]
    async fn newest_first_ordering() {
        let repo = EnquiryRepository::new(test_db().await);
        repo.create(sample(2024, 1)).await.unwrap();
        repo.create(sample(2025, 6)).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        // 最新记录在前
        assert_eq!(month_of_millis(all[0].created_at), 6);
        assert_eq!(month_of_millis(all[1].created_at), 1);
    }
}
