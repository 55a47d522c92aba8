//! Package API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/admin/packages", package_routes())
        // Public search routes
        .route("/api/packagesearch", get(handler::search))
        .route("/api/packageprices", get(handler::prices))
}

fn package_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
