//! Hotel Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Hotel;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const HOTEL_TABLE: &str = "hotel";

#[derive(Clone)]
pub struct HotelRepository {
    base: BaseRepository,
}

impl HotelRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all hotels, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Hotel>> {
        let hotels: Vec<Hotel> = self
            .base
            .db()
            .query("SELECT * FROM hotel ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(hotels)
    }

    /// Find hotel by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Hotel>> {
        let pure_id = strip_table_prefix(HOTEL_TABLE, id);
        let hotel: Option<Hotel> = self.base.db().select((HOTEL_TABLE, pure_id)).await?;
        Ok(hotel)
    }

    /// Create a new hotel
    pub async fn create(&self, data: Hotel) -> RepoResult<Hotel> {
        let created: Option<Hotel> = self.base.db().create(HOTEL_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create hotel".to_string()))
    }

    /// Replace an existing hotel record
    pub async fn replace(&self, id: &str, mut data: Hotel) -> RepoResult<Hotel> {
        let pure_id = strip_table_prefix(HOTEL_TABLE, id);
        data.id = None;

        let updated: Option<Hotel> = self
            .base
            .db()
            .update((HOTEL_TABLE, pure_id))
            .content(data)
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Hotel {} not found", id)))
    }

    /// Delete a hotel record
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(HOTEL_TABLE, id);
        let deleted: Option<Hotel> = self.base.db().delete((HOTEL_TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }

    /// Count all hotels
    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count_table(HOTEL_TABLE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::now_millis;
    use surrealdb::engine::local::Mem;

    async fn test_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
        db.use_ns("test").use_db("test").await.expect("ns/db");
        db
    }

    fn sample(name: &str) -> Hotel {
        let now = now_millis();
        Hotel {
            id: None,
            name: name.to_string(),
            description: "desc".to_string(),
            location: "Goa".to_string(),
            price_per_night: 120.0,
            rating: 4.5,
            amenities: vec!["wifi".to_string()],
            images: vec!["u1".to_string(), "u2".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn replace_preserves_image_order() {
        let repo = HotelRepository::new(test_db().await);
        let created = repo.create(sample("Sea View")).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        // 保留原有两张图并追加一张新图，顺序保持不变
        let mut changed = created.clone();
        changed.images = vec!["u1".to_string(), "u2".to_string(), "u3".to_string()];
        let updated = repo.replace(&id, changed).await.unwrap();
        assert_eq!(updated.images, vec!["u1", "u2", "u3"]);
    }
}
