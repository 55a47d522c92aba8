//! Package API Handlers
//!
//! 套餐是图片集最多的实体：封面 (≤1)、主图集 (≤10)、
//! 每个行程活动各自的图片集 (一个扁平批次按声明数量切片)。

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;

use crate::api::forms::{CollectedForm, upload_files};
use crate::core::ServerState;
use crate::db::models::{Activity, Package};
use crate::db::repository::{PackageRepository, PackageSearch};
use crate::media::{ObjectStore, purge_assets, reconcile, slice_flat_batch};
use crate::utils::time::now_millis;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

const MEDIA_FOLDER: &str = "packages";

/// 主图集容量
const MAX_GALLERY_IMAGES: usize = 10;
/// 一次请求的活动图片批次上限
const MAX_ACTIVITY_IMAGES: usize = 50;

/// 表单里 JSON 编码的行程活动
///
/// `existingImages` 声明该活动要保留的旧图；
/// `newImageCount` 声明从扁平批次消费的新图数量 (默认 1)。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityForm {
    pub title: String,
    pub description: String,
    pub existing_images: Vec<String>,
    pub new_image_count: Option<usize>,
}

/// 公共搜索参数
#[derive(Debug, Deserialize)]
pub struct PackageSearchQuery {
    pub title: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
    pub days: Option<i32>,
}

// =============================================================================
// Package Handlers
// =============================================================================

/// GET /api/admin/packages - 获取所有套餐
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Package>>> {
    let repo = PackageRepository::new(state.get_db());
    let packages = repo.find_all().await?;
    Ok(Json(packages))
}

/// GET /api/admin/packages/:id - 获取单个套餐
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Package>> {
    let repo = PackageRepository::new(state.get_db());
    let package = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Package {}", id)))?;
    Ok(Json(package))
}

/// POST /api/admin/packages - 创建套餐 (multipart)
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<Package>> {
    let form = CollectedForm::from_multipart(multipart).await?;
    let (package, _orphaned) = apply_form(&form, None, state.media.as_ref()).await?;

    let repo = PackageRepository::new(state.get_db());
    let created = repo.create(package).await?;

    tracing::info!(
        title = %created.title,
        images = created.images.len(),
        activities = created.itinerary.len(),
        "Package created"
    );

    Ok(Json(created))
}

/// PUT /api/admin/packages/:id - 更新套餐 (multipart)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Package>> {
    let repo = PackageRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Package {}", id)))?;

    let form = CollectedForm::from_multipart(multipart).await?;
    let (merged, orphaned) = apply_form(&form, Some(existing), state.media.as_ref()).await?;

    // 孤儿删除 fail-open：失败只记录，不阻塞记录更新
    let outcome = purge_assets(state.media.as_ref(), &orphaned).await;
    if outcome.failed > 0 {
        tracing::warn!(failed = outcome.failed, "Some orphan deletions failed during package update");
    }

    let updated = repo.replace(&id, merged).await?;
    Ok(Json(updated))
}

/// DELETE /api/admin/packages/:id - 删除套餐
///
/// 先尝试删除全部远端资产 (fail-open)，再移除记录；
/// 记录移除后无论单个资产删除成败都报告成功。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = PackageRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Package {}", id)))?;

    let refs = collect_image_refs(&existing);
    purge_assets(state.media.as_ref(), &refs).await;

    repo.delete(&id).await?;
    Ok(Json(true))
}

/// GET /api/packagesearch - 公共搜索
///
/// 收窄条件 (价格区间/天数) 导致零结果时，退回仅标题过滤并返回其结果
/// —— 这是刻意的优雅降级，不是错误。
pub async fn search(
    State(state): State<ServerState>,
    Query(q): Query<PackageSearchQuery>,
) -> AppResult<Json<Vec<Package>>> {
    let repo = PackageRepository::new(state.get_db());
    let params = PackageSearch {
        title: q.title.unwrap_or_default(),
        min_price: q.min_price,
        max_price: q.max_price,
        days: q.days,
    };

    let hits = repo.search(&params).await?;
    if hits.is_empty() && params.is_narrowed() {
        let fallback = repo.search(&params.title_only()).await?;
        return Ok(Json(fallback));
    }

    Ok(Json(hits))
}

/// GET /api/packageprices - 去重后的套餐价格列表
pub async fn prices(State(state): State<ServerState>) -> AppResult<Json<Vec<f64>>> {
    let repo = PackageRepository::new(state.get_db());
    let prices = repo.distinct_prices().await?;
    Ok(Json(prices))
}

// =============================================================================
// Form assembly
// =============================================================================

fn blank_package() -> Package {
    Package {
        id: None,
        title: String::new(),
        description: String::new(),
        location: String::new(),
        price: 0.0,
        days: 0,
        thumbnail: None,
        images: Vec::new(),
        itinerary: Vec::new(),
        created_at: 0,
        updated_at: 0,
    }
}

/// 收集一个套餐引用的全部图片 (封面 + 主图集 + 各活动图集)
fn collect_image_refs(package: &Package) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();
    refs.extend(package.thumbnail.clone());
    refs.extend(package.images.iter().cloned());
    for activity in &package.itinerary {
        refs.extend(activity.images.iter().cloned());
    }
    refs
}

/// Apply a multipart form onto an existing package (or a blank one for
/// create). Returns the merged record plus every orphaned image reference.
async fn apply_form(
    form: &CollectedForm,
    existing: Option<Package>,
    store: &dyn ObjectStore,
) -> AppResult<(Package, Vec<String>)> {
    let is_create = existing.is_none();
    if is_create {
        form.require_fields(&["title", "description", "location", "price", "days"])?;
    }

    let mut package = existing.unwrap_or_else(blank_package);

    if let Some(v) = form.text("title") {
        package.title = v.to_string();
    }
    if let Some(v) = form.text("description") {
        package.description = v.to_string();
    }
    if let Some(v) = form.text("location") {
        package.location = v.to_string();
    }
    if let Some(v) = form.f64_field("price")? {
        package.price = v;
    }
    if let Some(v) = form.i32_field("days")? {
        package.days = v;
    }

    validate_required_text(&package.title, "title", MAX_NAME_LEN)?;

    let mut orphaned: Vec<String> = Vec::new();

    // 封面 (容量 1)：retained 来自 existingThumbnail 字段
    let retained_thumbnail: Vec<String> = form
        .text("existingThumbnail")
        .filter(|s| !s.trim().is_empty())
        .map(|s| vec![s.to_string()])
        .unwrap_or_default();
    let thumbnail_files = form.files("thumbnail");
    let new_thumbnail = upload_files(
        store,
        &thumbnail_files[..thumbnail_files.len().min(1)],
        MEDIA_FOLDER,
    )
    .await?;
    let existing_thumbnail: Vec<String> = package.thumbnail.clone().into_iter().collect();
    let merged = reconcile(&existing_thumbnail, &retained_thumbnail, new_thumbnail, Some(1));
    package.thumbnail = merged.new_set.into_iter().next();
    orphaned.extend(merged.orphaned);

    // 主图集 (容量 10)
    let retained_images: Vec<String> = form.json_field("existingImages");
    let new_images = upload_files(store, &form.files("images"), MEDIA_FOLDER).await?;
    let merged = reconcile(
        &package.images,
        &retained_images,
        new_images,
        Some(MAX_GALLERY_IMAGES),
    );
    package.images = merged.new_set;
    orphaned.extend(merged.orphaned);

    // 行程活动：一个扁平批次按每个活动声明的数量切片
    let activity_forms: Vec<ActivityForm> = form.json_field("itinerary");
    let activity_files = form.files("activityImages");
    let flat_urls = upload_files(
        store,
        &activity_files[..activity_files.len().min(MAX_ACTIVITY_IMAGES)],
        MEDIA_FOLDER,
    )
    .await?;
    let counts: Vec<usize> = activity_forms
        .iter()
        .map(|a| a.new_image_count.unwrap_or(1))
        .collect();
    let slices = slice_flat_batch(&counts, flat_urls);

    let old_activities = std::mem::take(&mut package.itinerary);
    let mut itinerary = Vec::with_capacity(activity_forms.len());
    for (index, (activity, slice)) in activity_forms.iter().zip(slices).enumerate() {
        let existing_images: &[String] = old_activities
            .get(index)
            .map(|a| a.images.as_slice())
            .unwrap_or(&[]);
        let merged = reconcile(existing_images, &activity.existing_images, slice, None);
        orphaned.extend(merged.orphaned);
        itinerary.push(Activity {
            title: activity.title.clone(),
            description: activity.description.clone(),
            images: merged.new_set,
        });
    }
    // 从行程中移除的活动，其整个图片集成为孤儿
    for removed in old_activities.iter().skip(activity_forms.len()) {
        let merged = reconcile(&removed.images, &[], Vec::new(), None);
        orphaned.extend(merged.orphaned);
    }
    package.itinerary = itinerary;

    let now = now_millis();
    if is_create {
        package.created_at = now;
    }
    package.updated_at = now;

    Ok((package, orphaned))
}
