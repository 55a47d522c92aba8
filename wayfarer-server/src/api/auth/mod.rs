//! Auth API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /api/admin/login: public (no auth required)
/// - /api/admin/change-password: protected (requires session token)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/login", post(handler::login))
        .route("/api/admin/change-password", post(handler::change_password))
}
