//! Hotel Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Hotel ID type
pub type HotelId = RecordId;

/// Hotel model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<HotelId>,
    pub name: String,
    pub description: String,
    pub location: String,
    /// 每晚价格
    pub price_per_night: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// 图集 (有序，最多 10 张)
    #[serde(default)]
    pub images: Vec<String>,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
    /// 更新时间 (Unix millis)
    #[serde(default)]
    pub updated_at: i64,
}
