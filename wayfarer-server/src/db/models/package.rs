//! Travel Package Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Package ID type
pub type PackageId = RecordId;

/// 行程中的单个活动
///
/// 每个活动拥有自己的图片集，显示顺序即存储顺序。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Travel package model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<PackageId>,
    pub title: String,
    pub description: String,
    pub location: String,
    /// 套餐价格
    pub price: f64,
    /// 行程天数
    pub days: i32,
    /// 封面图 (单图集)
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// 主图集 (有序，最多 10 张)
    #[serde(default)]
    pub images: Vec<String>,
    /// 行程活动，每个活动带自己的图片集
    #[serde(default)]
    pub itinerary: Vec<Activity>,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
    /// 更新时间 (Unix millis)
    #[serde(default)]
    pub updated_at: i64,
}
