//! Flight Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Flight ID type
pub type FlightId = RecordId;

/// Flight model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FlightId>,
    pub airline: String,
    #[serde(default)]
    pub flight_number: String,
    pub departure_city: String,
    pub arrival_city: String,
    /// 出发日期 (YYYY-MM-DD)
    pub departure_date: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: String,
    pub price: f64,
    #[serde(default)]
    pub seats: i32,
    /// 航司 logo (0 或 1 张)
    #[serde(default)]
    pub logo: Option<String>,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
    /// 更新时间 (Unix millis)
    #[serde(default)]
    pub updated_at: i64,
}
