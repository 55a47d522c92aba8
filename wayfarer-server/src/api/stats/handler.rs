//! Statistics API Handlers
//!
//! 纯读侧汇总，无副作用。

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{
    EnquiryRepository, FlightRepository, HotelRepository, PackageRepository, VisaRepository,
};
use crate::utils::AppResult;

/// Per-entity totals
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub packages: i64,
    pub hotels: i64,
    pub visas: i64,
    pub flights: i64,
    pub enquiries: i64,
}

/// GET /api/admin/stats - 各实体总数
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<StatsResponse>> {
    let db = state.get_db();

    let packages = PackageRepository::new(db.clone()).count().await?;
    let hotels = HotelRepository::new(db.clone()).count().await?;
    let visas = VisaRepository::new(db.clone()).count().await?;
    let flights = FlightRepository::new(db.clone()).count().await?;
    let enquiries = EnquiryRepository::new(db).count().await?;

    Ok(Json(StatsResponse {
        packages,
        hotels,
        visas,
        flights,
        enquiries,
    }))
}
