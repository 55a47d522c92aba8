//! Database Module
//!
//! Handles the embedded SurrealDB connection (one connection per process,
//! safe for concurrent use by the driver).

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const DB_NAMESPACE: &str = "wayfarer";
const DB_NAME: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(DB_NAMESPACE)
            .use_db(DB_NAME)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %db_path, "Database connection established (embedded SurrealDB)");

        Ok(Self { db })
    }
}
