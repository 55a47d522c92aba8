//! Enquiry API Handlers
//!
//! 公共联系表单：创建后不可变，从不引用图片。

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{Enquiry, EnquiryCreate};
use crate::db::repository::EnquiryRepository;
use crate::utils::time::{month_name, now_millis};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::AppResult;

/// 月度统计桶：1-12 月全部出现，按月份名标注
#[derive(Debug, Serialize)]
pub struct MonthlyBucket {
    pub month: u32,
    pub name: &'static str,
    pub count: i64,
}

/// POST /api/query - 创建客户咨询
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EnquiryCreate>,
) -> AppResult<Json<Enquiry>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.message, "message", MAX_TEXT_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.subject, "subject", MAX_SHORT_TEXT_LEN)?;

    let enquiry = Enquiry {
        id: None,
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        subject: payload.subject,
        message: payload.message,
        created_at: now_millis(),
    };

    let repo = EnquiryRepository::new(state.get_db());
    let created = repo.create(enquiry).await?;

    tracing::info!(email = %created.email, "Enquiry received");

    Ok(Json(created))
}

/// GET /api/query - 获取所有咨询 (最新在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Enquiry>>> {
    let repo = EnquiryRepository::new(state.get_db());
    let enquiries = repo.find_all().await?;
    Ok(Json(enquiries))
}

/// GET /api/query/monthly - 按日历月 (1-12) 统计咨询数
///
/// 跨年份合并到同一个月份桶；十二个桶全部返回 (空月补零)。
pub async fn monthly(State(state): State<ServerState>) -> AppResult<Json<Vec<MonthlyBucket>>> {
    let repo = EnquiryRepository::new(state.get_db());
    let counts = repo.monthly_counts().await?;

    let buckets = (1..=12u32)
        .map(|month| MonthlyBucket {
            month,
            name: month_name(month),
            count: counts[(month - 1) as usize],
        })
        .collect();

    Ok(Json(buckets))
}
