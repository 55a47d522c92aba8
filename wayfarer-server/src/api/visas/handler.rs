//! Visa API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
};

use crate::api::forms::{CollectedForm, upload_files};
use crate::core::ServerState;
use crate::db::models::Visa;
use crate::db::repository::VisaRepository;
use crate::media::{ObjectStore, purge_assets, reconcile};
use crate::utils::time::now_millis;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

const MEDIA_FOLDER: &str = "visas";

/// GET /api/admin/visas - 获取所有签证服务
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Visa>>> {
    let repo = VisaRepository::new(state.get_db());
    let visas = repo.find_all().await?;
    Ok(Json(visas))
}

/// GET /api/admin/visas/:id - 获取单个签证服务
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Visa>> {
    let repo = VisaRepository::new(state.get_db());
    let visa = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Visa {}", id)))?;
    Ok(Json(visa))
}

/// POST /api/admin/visas - 创建签证服务 (multipart)
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<Visa>> {
    let form = CollectedForm::from_multipart(multipart).await?;
    let (visa, _orphaned) = apply_form(&form, None, state.media.as_ref()).await?;

    let repo = VisaRepository::new(state.get_db());
    let created = repo.create(visa).await?;

    tracing::info!(country = %created.country, "Visa service created");

    Ok(Json(created))
}

/// PUT /api/admin/visas/:id - 更新签证服务 (multipart)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Visa>> {
    let repo = VisaRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Visa {}", id)))?;

    let form = CollectedForm::from_multipart(multipart).await?;
    let (merged, orphaned) = apply_form(&form, Some(existing), state.media.as_ref()).await?;

    let outcome = purge_assets(state.media.as_ref(), &orphaned).await;
    if outcome.failed > 0 {
        tracing::warn!(failed = outcome.failed, "Some orphan deletions failed during visa update");
    }

    let updated = repo.replace(&id, merged).await?;
    Ok(Json(updated))
}

/// DELETE /api/admin/visas/:id - 删除签证服务
///
/// 图片 URL 提取不出标识符时跳过远端删除；记录仍会移除并报告成功。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = VisaRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Visa {}", id)))?;

    let refs: Vec<String> = existing.image.clone().into_iter().collect();
    purge_assets(state.media.as_ref(), &refs).await;

    repo.delete(&id).await?;
    Ok(Json(true))
}

// =============================================================================
// Form assembly
// =============================================================================

fn blank_visa() -> Visa {
    Visa {
        id: None,
        country: String::new(),
        description: String::new(),
        price: 0.0,
        processing_days: 0,
        requirements: Vec::new(),
        image: None,
        created_at: 0,
        updated_at: 0,
    }
}

/// Apply a multipart form onto an existing visa (or a blank one for
/// create). Returns the merged record plus the orphaned image references.
async fn apply_form(
    form: &CollectedForm,
    existing: Option<Visa>,
    store: &dyn ObjectStore,
) -> AppResult<(Visa, Vec<String>)> {
    let is_create = existing.is_none();
    if is_create {
        form.require_fields(&["country", "description", "price"])?;
    }

    let mut visa = existing.unwrap_or_else(blank_visa);

    if let Some(v) = form.text("country") {
        visa.country = v.to_string();
    }
    if let Some(v) = form.text("description") {
        visa.description = v.to_string();
    }
    if let Some(v) = form.f64_field("price")? {
        visa.price = v;
    }
    if let Some(v) = form.i32_field("processingDays")? {
        visa.processing_days = v;
    }
    if form.text("requirements").is_some() {
        visa.requirements = form.json_field("requirements");
    }

    validate_required_text(&visa.country, "country", MAX_NAME_LEN)?;

    // 单图集 (容量 1)：retained 来自 existingImage 字段
    let retained: Vec<String> = form
        .text("existingImage")
        .filter(|s| !s.trim().is_empty())
        .map(|s| vec![s.to_string()])
        .unwrap_or_default();
    let image_files = form.files("image");
    let new_image = upload_files(
        store,
        &image_files[..image_files.len().min(1)],
        MEDIA_FOLDER,
    )
    .await?;
    let existing_image: Vec<String> = visa.image.clone().into_iter().collect();
    let merged = reconcile(&existing_image, &retained, new_image, Some(1));

    visa.image = merged.new_set.into_iter().next();

    let now = now_millis();
    if is_create {
        visa.created_at = now;
    }
    visa.updated_at = now;

    Ok((visa, merged.orphaned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ServerState;
    use crate::media::testing::MemoryStore;
    use std::sync::Arc;
    use surrealdb::Surreal;
    use surrealdb::engine::local::Mem;

    async fn test_state(store: Arc<MemoryStore>) -> ServerState {
        let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
        db.use_ns("test").use_db("test").await.expect("ns/db");
        ServerState::for_tests(db, store)
    }

    #[tokio::test]
    async fn delete_with_unextractable_image_url_still_removes_record() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone()).await;

        let repo = VisaRepository::new(state.get_db());
        let mut visa = blank_visa();
        visa.country = "Japan".to_string();
        visa.description = "Tourist visa".to_string();
        visa.price = 80.0;
        // URL 不符合远端存储形状 → 提取不到标识符
        visa.image = Some("https://elsewhere.example.com/files/visa.jpg".to_string());
        let created = repo.create(visa).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let result = super::delete(
            axum::extract::State(state.clone()),
            axum::extract::Path(id.clone()),
        )
        .await
        .unwrap();

        // 零次远端删除，记录仍被移除，操作报告成功
        assert!(result.0);
        assert!(store.deletes().is_empty());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replacing_the_single_image_orphans_the_old_one() {
        let store = MemoryStore::new();

        let mut existing = blank_visa();
        existing.country = "Japan".to_string();
        existing.image = Some("https://assets.test/image/upload/v1/visas/old.jpg".to_string());

        // 不保留旧图，上传一张新图
        let form = CollectedForm {
            texts: Default::default(),
            files: vec![crate::api::forms::UploadedFile {
                field: "image".to_string(),
                filename: "new.png".to_string(),
                bytes: vec![
                    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
                    0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
                    0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00,
                    0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00, 0x01, 0x00, 0x00,
                    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
                    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
                ],
            }],
        };

        let (merged, orphaned) = apply_form(&form, Some(existing), &store).await.unwrap();

        assert!(merged.image.unwrap().starts_with("https://assets.test/"));
        assert_eq!(
            orphaned,
            vec!["https://assets.test/image/upload/v1/visas/old.jpg".to_string()]
        );
    }
}
