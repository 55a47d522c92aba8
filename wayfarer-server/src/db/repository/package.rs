//! Package Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Package;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PACKAGE_TABLE: &str = "package";

/// 套餐搜索条件
///
/// `title` 为大小写不敏感的子串匹配；价格区间与天数为可选收窄条件。
#[derive(Debug, Clone, Default)]
pub struct PackageSearch {
    pub title: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub days: Option<i32>,
}

impl PackageSearch {
    /// 是否带有标题以外的收窄条件
    pub fn is_narrowed(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some() || self.days.is_some()
    }

    /// 退化为仅按标题过滤的条件
    pub fn title_only(&self) -> Self {
        Self {
            title: self.title.clone(),
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct PackageRepository {
    base: BaseRepository,
}

impl PackageRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all packages, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Package>> {
        let packages: Vec<Package> = self
            .base
            .db()
            .query("SELECT * FROM package ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(packages)
    }

    /// Find package by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Package>> {
        let pure_id = strip_table_prefix(PACKAGE_TABLE, id);
        let package: Option<Package> = self.base.db().select((PACKAGE_TABLE, pure_id)).await?;
        Ok(package)
    }

    /// Create a new package
    pub async fn create(&self, data: Package) -> RepoResult<Package> {
        let created: Option<Package> = self
            .base
            .db()
            .create(PACKAGE_TABLE)
            .content(data)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create package".to_string()))
    }

    /// Replace an existing package record
    pub async fn replace(&self, id: &str, mut data: Package) -> RepoResult<Package> {
        let pure_id = strip_table_prefix(PACKAGE_TABLE, id);
        // 记录由 key 寻址，content 不携带 id
        data.id = None;

        let updated: Option<Package> = self
            .base
            .db()
            .update((PACKAGE_TABLE, pure_id))
            .content(data)
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Package {} not found", id)))
    }

    /// Delete a package record
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(PACKAGE_TABLE, id);
        let deleted: Option<Package> = self.base.db().delete((PACKAGE_TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }

    /// Count all packages
    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count_table(PACKAGE_TABLE).await
    }

    /// Search packages by title substring (case-insensitive) with optional
    /// price range and exact day-count narrowing
    pub async fn search(&self, params: &PackageSearch) -> RepoResult<Vec<Package>> {
        let mut conditions: Vec<&str> =
            vec!["string::contains(string::lowercase(title), $title)"];
        if params.min_price.is_some() {
            conditions.push("price >= $min_price");
        }
        if params.max_price.is_some() {
            conditions.push("price <= $max_price");
        }
        if params.days.is_some() {
            conditions.push("days = $days");
        }

        let sql = format!(
            "SELECT * FROM package WHERE {} ORDER BY created_at DESC",
            conditions.join(" AND ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("title", params.title.to_lowercase()));
        if let Some(v) = params.min_price {
            query = query.bind(("min_price", v));
        }
        if let Some(v) = params.max_price {
            query = query.bind(("max_price", v));
        }
        if let Some(v) = params.days {
            query = query.bind(("days", v));
        }

        let packages: Vec<Package> = query.await?.take(0)?;
        Ok(packages)
    }

    /// Distinct package prices, ascending
    pub async fn distinct_prices(&self) -> RepoResult<Vec<f64>> {
        #[derive(serde::Deserialize)]
        struct PriceRow {
            price: f64,
        }

        let rows: Vec<PriceRow> = self
            .base
            .db()
            .query("SELECT price FROM package GROUP BY price")
            .await?
            .take(0)?;

        let mut prices: Vec<f64> = rows.into_iter().map(|r| r.price).collect();
        prices.sort_by(|a, b| a.total_cmp(b));
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Package;
    use crate::utils::time::now_millis;
    use surrealdb::engine::local::Mem;

    async fn test_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
        db.use_ns("test").use_db("test").await.expect("ns/db");
        db
    }

    fn sample(title: &str, price: f64, days: i32) -> Package {
        let now = now_millis();
        Package {
            id: None,
            title: title.to_string(),
            description: "desc".to_string(),
            location: "somewhere".to_string(),
            price,
            days,
            thumbnail: None,
            images: vec![],
            itinerary: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_and_find_round_trip() {
        let repo = PackageRepository::new(test_db().await);

        let created = repo.create(sample("Goa Beach Escape", 1500.0, 4)).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let found = repo.find_by_id(&id).await.unwrap().expect("package exists");
        assert_eq!(found.title, "Goa Beach Escape");
        assert_eq!(found.days, 4);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let repo = PackageRepository::new(test_db().await);
        repo.create(sample("Goa Beach Escape", 1500.0, 4)).await.unwrap();
        repo.create(sample("Kerala Backwaters", 2200.0, 6)).await.unwrap();

        let hits = repo
            .search(&PackageSearch {
                title: "gOa".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Goa Beach Escape");
    }

    #[tokio::test]
    async fn narrowed_search_filters_price_and_days() {
        let repo = PackageRepository::new(test_db().await);
        repo.create(sample("Goa Beach Escape", 1500.0, 4)).await.unwrap();
        repo.create(sample("Goa Luxury Resort", 5000.0, 4)).await.unwrap();

        let hits = repo
            .search(&PackageSearch {
                title: "goa".to_string(),
                min_price: Some(1000.0),
                max_price: Some(2000.0),
                days: Some(4),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].price, 1500.0);

        // 收窄到零结果时调用方会退回标题过滤；确认零结果本身可达
        let none = repo
            .search(&PackageSearch {
                title: "goa".to_string(),
                min_price: Some(9000.0),
                max_price: Some(9999.0),
                days: None,
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn distinct_prices_deduplicates_and_sorts() {
        let repo = PackageRepository::new(test_db().await);
        repo.create(sample("A", 2200.0, 5)).await.unwrap();
        repo.create(sample("B", 1500.0, 4)).await.unwrap();
        repo.create(sample("C", 1500.0, 7)).await.unwrap();

        let prices = repo.distinct_prices().await.unwrap();
        assert_eq!(prices, vec![1500.0, 2200.0]);
    }

    #[tokio::test]
    async fn replace_and_delete() {
        let repo = PackageRepository::new(test_db().await);
        let created = repo.create(sample("Goa Beach Escape", 1500.0, 4)).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let mut changed = created.clone();
        changed.title = "Goa Beach Escape Deluxe".to_string();
        let updated = repo.replace(&id, changed).await.unwrap();
        assert_eq!(updated.title, "Goa Beach Escape Deluxe");

        assert!(repo.delete(&id).await.unwrap());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
