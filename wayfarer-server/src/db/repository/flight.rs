//! Flight Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Flight;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const FLIGHT_TABLE: &str = "flight";

/// 航班搜索条件
#[derive(Debug, Clone, Default)]
pub struct FlightSearch {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
}

#[derive(Clone)]
pub struct FlightRepository {
    base: BaseRepository,
}

impl FlightRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all flights, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Flight>> {
        let flights: Vec<Flight> = self
            .base
            .db()
            .query("SELECT * FROM flight ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(flights)
    }

    /// Find flight by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Flight>> {
        let pure_id = strip_table_prefix(FLIGHT_TABLE, id);
        let flight: Option<Flight> = self.base.db().select((FLIGHT_TABLE, pure_id)).await?;
        Ok(flight)
    }

    /// Create a new flight
    pub async fn create(&self, data: Flight) -> RepoResult<Flight> {
        let created: Option<Flight> = self.base.db().create(FLIGHT_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create flight".to_string()))
    }

    /// Replace an existing flight record
    pub async fn replace(&self, id: &str, mut data: Flight) -> RepoResult<Flight> {
        let pure_id = strip_table_prefix(FLIGHT_TABLE, id);
        data.id = None;

        let updated: Option<Flight> = self
            .base
            .db()
            .update((FLIGHT_TABLE, pure_id))
            .content(data)
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Flight {} not found", id)))
    }

    /// Delete a flight record
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(FLIGHT_TABLE, id);
        let deleted: Option<Flight> = self.base.db().delete((FLIGHT_TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }

    /// Count all flights
    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count_table(FLIGHT_TABLE).await
    }

    /// Search flights by route (case-insensitive city match) and optional date
    pub async fn search(&self, params: &FlightSearch) -> RepoResult<Vec<Flight>> {
        let mut conditions: Vec<&str> = Vec::new();
        if params.from.is_some() {
            conditions.push("string::lowercase(departure_city) = $from");
        }
        if params.to.is_some() {
            conditions.push("string::lowercase(arrival_city) = $to");
        }
        if params.date.is_some() {
            conditions.push("departure_date = $date");
        }

        if conditions.is_empty() {
            return self.find_all().await;
        }

        let sql = format!(
            "SELECT * FROM flight WHERE {} ORDER BY departure_date",
            conditions.join(" AND ")
        );

        let mut query = self.base.db().query(sql);
        if let Some(v) = &params.from {
            query = query.bind(("from", v.to_lowercase()));
        }
        if let Some(v) = &params.to {
            query = query.bind(("to", v.to_lowercase()));
        }
        if let Some(v) = &params.date {
            query = query.bind(("date", v.clone()));
        }

        let flights: Vec<Flight> = query.await?.take(0)?;
        Ok(flights)
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

    fn sample(from: &str, to: &str, date: &str) -> Flight {
        let now = now_millis();
        Flight {
            id: None,
            airline: "IndiSky".to_string(),
            flight_number: "IS-204".to_string(),
            departure_city: from.to_string(),
            arrival_city: to.to_string(),
            departure_date: date.to_string(),
            departure_time: "08:30".to_string(),
            arrival_time: "11:05".to_string(),
            price: 180.0,
            seats: 120,
            logo: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn search_matches_route_case_insensitively() {
        let repo = FlightRepository::new(test_db().await);
        repo.create(sample("Delhi", "Goa", "2026-09-01")).await.unwrap();
        repo.create(sample("Delhi", "Mumbai", "2026-09-01")).await.unwrap();

        let hits = repo
            .search(&FlightSearch {
                from: Some("delhi".to_string()),
                to: Some("GOA".to_string()),
                date: None,
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].arrival_city, "Goa");
    }

    #[tokio::test]
    async fn search_narrows_by_date() {
        let repo = FlightRepository::new(test_db().await);
        repo.create(sample("Delhi", "Goa", "2026-09-01")).await.unwrap();
        repo.create(sample("Delhi", "Goa", "2026-09-02")).await.unwrap();

        let hits = repo
            .search(&FlightSearch {
                from: Some("Delhi".to_string()),
                to: Some("Goa".to_string()),
                date: Some("2026-09-02".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].departure_date, "2026-09-02");
    }
}
