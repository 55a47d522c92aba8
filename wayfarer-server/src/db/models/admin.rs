//! Admin Credential Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Admin ID type
pub type AdminId = RecordId;

/// Admin credential record
///
/// 全系统只有一条记录，进程启动时若不存在则播种。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AdminId>,
    pub username: String,
    /// Argon2 密码哈希；凭证记录从不直接出现在任何响应体中
    pub hash_pass: String,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
    /// 更新时间 (Unix millis)
    #[serde(default)]
    pub updated_at: i64,
}

impl Admin {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}
