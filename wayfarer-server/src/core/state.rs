use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::AdminRepository;
use crate::media::{HttpObjectStore, ObjectStore};

/// Shared per-process state: the document-store handle, the object-store
/// client and the JWT service. All are safe for concurrent use.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub media: Arc<dyn ObjectStore>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        media: Arc<dyn ObjectStore>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            config,
            db,
            media,
            jwt_service,
        }
    }

    pub async fn initialize(config: &Config) -> Self {
        // 1. Initialize DB
        let db_path = PathBuf::from(&config.work_dir).join("wayfarer.db");
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        // 2. Seed admin credential (single record, created once if absent)
        let admin_repo = AdminRepository::new(db.clone());
        admin_repo
            .ensure_seeded(&config.admin_username, &config.admin_password)
            .await
            .expect("Failed to seed admin credential");

        // 3. Initialize services
        let media: Arc<dyn ObjectStore> = Arc::new(HttpObjectStore::new(config.media.clone()));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(config.clone(), db, media, jwt_service)
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn object_store(&self) -> Arc<dyn ObjectStore> {
        self.media.clone()
    }

    /// Test-only state over an in-memory database and a substituted store
    #[cfg(test)]
    pub(crate) fn for_tests(db: Surreal<Db>, media: Arc<dyn ObjectStore>) -> Self {
        let config = Config {
            work_dir: "/tmp/wayfarer-test".into(),
            http_port: 0,
            environment: "test".into(),
            jwt: crate::auth::JwtConfig {
                secret: "test-secret-key-of-sufficient-length!!".into(),
                expiration_minutes: 1440,
                issuer: "wayfarer-server".into(),
                audience: "wayfarer-admin".into(),
            },
            media: crate::media::MediaConfig {
                api_base: "http://localhost:0".into(),
                cloud_name: "test".into(),
                api_key: String::new(),
                api_secret: String::new(),
            },
            admin_username: "admin".into(),
            admin_password: "changeme".into(),
        };
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self::new(config, db, media, jwt_service)
    }
}
