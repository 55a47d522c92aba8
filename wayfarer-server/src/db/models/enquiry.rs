//! Customer Enquiry Model
//!
//! 客户咨询记录：创建后不可变，从不引用图片。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Enquiry ID type
pub type EnquiryId = RecordId;

/// Customer enquiry record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<EnquiryId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
}

/// Create enquiry payload (public contact form)
#[derive(Debug, Clone, Deserialize)]
pub struct EnquiryCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}
