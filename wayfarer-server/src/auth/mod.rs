//! 认证模块
//!
//! JWT + Argon2 管理员认证体系

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentAdmin, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
