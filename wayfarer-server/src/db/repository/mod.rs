//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Auth
pub mod admin;

// Catalog Domain
pub mod flight;
pub mod hotel;
pub mod package;
pub mod visa;

// Enquiries
pub mod enquiry;

// Re-exports
pub use admin::AdminRepository;
pub use enquiry::EnquiryRepository;
pub use flight::{FlightRepository, FlightSearch};
pub use hotel::HotelRepository;
pub use package::{PackageRepository, PackageSearch};
pub use visa::VisaRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// API 层接收的 ID 可以是 "package:abc" 也可以是裸 "abc"；
// repository 层通过 strip_table_prefix 归一化后再寻址记录。

/// Strip the "table:" prefix from an id if present
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Count all records in a table
    pub async fn count_table(&self, table: &str) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }

        let rows: Vec<CountRow> = self
            .db
            .query(format!("SELECT count() FROM {table} GROUP ALL"))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
