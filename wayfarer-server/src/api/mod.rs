//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 管理员登录 / 修改密码
//! - [`packages`] - 套餐管理接口 + 公共搜索
//! - [`hotels`] - 酒店管理接口
//! - [`visas`] - 签证管理接口
//! - [`flights`] - 航班管理接口 + 公共搜索
//! - [`enquiries`] - 客户咨询接口
//! - [`stats`] - 管理后台统计

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod forms;

pub mod auth;
pub mod health;

// Data models API
pub mod enquiries;
pub mod flights;
pub mod hotels;
pub mod packages;
pub mod stats;
pub mod visas;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// 多段表单整体大小上限 (套餐一次最多 61 张图)
const MAX_MULTIPART_BODY: usize = 64 * 1024 * 1024;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Auth API - login is public, change-password requires auth
        .merge(auth::router())
        // Admin CRUD API - admin session required
        .merge(packages::router())
        .merge(hotels::router())
        .merge(visas::router())
        .merge(flights::router())
        // Stats API - admin session required
        .merge(stats::router())
        // Enquiry API - public routes
        .merge(enquiries::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Multipart bodies carry image batches, raise the default limit
        .layer(DefaultBodyLimit::max(MAX_MULTIPART_BODY))
        // ========== Application Middleware ==========
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Admin session gate - executes before routes, injects CurrentAdmin
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
