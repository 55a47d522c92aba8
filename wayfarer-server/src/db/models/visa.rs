//! Visa Service Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Visa ID type
pub type VisaId = RecordId;

/// Visa service model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visa {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<VisaId>,
    pub country: String,
    pub description: String,
    pub price: f64,
    /// 办理周期 (天)
    #[serde(default)]
    pub processing_days: i32,
    #[serde(default)]
    pub requirements: Vec<String>,
    /// 单图集 (0 或 1 张)
    #[serde(default)]
    pub image: Option<String>,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
    /// 更新时间 (Unix millis)
    #[serde(default)]
    pub updated_at: i64,
}
