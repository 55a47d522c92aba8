//! Hotel API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
};

use crate::api::forms::{CollectedForm, upload_files};
use crate::core::ServerState;
use crate::db::models::Hotel;
use crate::db::repository::HotelRepository;
use crate::media::{ObjectStore, purge_assets, reconcile};
use crate::utils::time::now_millis;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

const MEDIA_FOLDER: &str = "hotels";

/// 图集容量
const MAX_GALLERY_IMAGES: usize = 10;

/// GET /api/admin/hotels - 获取所有酒店
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Hotel>>> {
    let repo = HotelRepository::new(state.get_db());
    let hotels = repo.find_all().await?;
    Ok(Json(hotels))
}

/// GET /api/admin/hotels/:id - 获取单个酒店
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Hotel>> {
    let repo = HotelRepository::new(state.get_db());
    let hotel = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {}", id)))?;
    Ok(Json(hotel))
}

/// POST /api/admin/hotels - 创建酒店 (multipart)
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<Hotel>> {
    let form = CollectedForm::from_multipart(multipart).await?;
    let (hotel, _orphaned) = apply_form(&form, None, state.media.as_ref()).await?;

    let repo = HotelRepository::new(state.get_db());
    let created = repo.create(hotel).await?;

    tracing::info!(name = %created.name, images = created.images.len(), "Hotel created");

    Ok(Json(created))
}

/// PUT /api/admin/hotels/:id - 更新酒店 (multipart)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Hotel>> {
    let repo = HotelRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {}", id)))?;

    let form = CollectedForm::from_multipart(multipart).await?;
    let (merged, orphaned) = apply_form(&form, Some(existing), state.media.as_ref()).await?;

    let outcome = purge_assets(state.media.as_ref(), &orphaned).await;
    if outcome.failed > 0 {
        tracing::warn!(failed = outcome.failed, "Some orphan deletions failed during hotel update");
    }

    let updated = repo.replace(&id, merged).await?;
    Ok(Json(updated))
}

/// DELETE /api/admin/hotels/:id - 删除酒店
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = HotelRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {}", id)))?;

    purge_assets(state.media.as_ref(), &existing.images).await;

    repo.delete(&id).await?;
    Ok(Json(true))
}

// =============================================================================
// Form assembly
// =============================================================================

fn blank_hotel() -> Hotel {
    Hotel {
        id: None,
        name: String::new(),
        description: String::new(),
        location: String::new(),
        price_per_night: 0.0,
        rating: 0.0,
        amenities: Vec::new(),
        images: Vec::new(),
        created_at: 0,
        updated_at: 0,
    }
}

/// Apply a multipart form onto an existing hotel (or a blank one for
/// create). Returns the merged record plus the orphaned image references.
async fn apply_form(
    form: &CollectedForm,
    existing: Option<Hotel>,
    store: &dyn ObjectStore,
) -> AppResult<(Hotel, Vec<String>)> {
    let is_create = existing.is_none();
    if is_create {
        form.require_fields(&["name", "description", "location", "pricePerNight"])?;
    }

    let mut hotel = existing.unwrap_or_else(blank_hotel);

    if let Some(v) = form.text("name") {
        hotel.name = v.to_string();
    }
    if let Some(v) = form.text("description") {
        hotel.description = v.to_string();
    }
    if let Some(v) = form.text("location") {
        hotel.location = v.to_string();
    }
    if let Some(v) = form.f64_field("pricePerNight")? {
        hotel.price_per_night = v;
    }
    if let Some(v) = form.f64_field("rating")? {
        hotel.rating = v;
    }
    if form.text("amenities").is_some() {
        hotel.amenities = form.json_field("amenities");
    }

    validate_required_text(&hotel.name, "name", MAX_NAME_LEN)?;

    let retained: Vec<String> = form.json_field("existingImages");
    let new_images = upload_files(store, &form.files("images"), MEDIA_FOLDER).await?;
    let merged = reconcile(&hotel.images, &retained, new_images, Some(MAX_GALLERY_IMAGES));

    hotel.images = merged.new_set;

    let now = now_millis();
    if is_create {
        hotel.created_at = now;
    }
    hotel.updated_at = now;

    Ok((hotel, merged.orphaned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::testing::MemoryStore;
    use std::collections::HashMap;

    const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x62, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn form(
        texts: &[(&str, &str)],
        files: Vec<crate::api::forms::UploadedFile>,
    ) -> CollectedForm {
        let texts: HashMap<String, String> = texts
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CollectedForm { texts, files }
    }

    #[tokio::test]
    async fn update_keeps_retained_images_and_appends_new_upload() {
        let store = MemoryStore::new();

        let mut existing = blank_hotel();
        existing.name = "Sea View".to_string();
        existing.description = "old".to_string();
        existing.location = "Goa".to_string();
        existing.price_per_night = 120.0;
        existing.images = vec!["u1".to_string(), "u2".to_string()];

        let form = form(
            &[("existingImages", r#"["u1","u2"]"#)],
            vec![crate::api::forms::UploadedFile {
                field: "images".to_string(),
                filename: "new.png".to_string(),
                bytes: PNG_BYTES.to_vec(),
            }],
        );

        let (merged, orphaned) = apply_form(&form, Some(existing), &store).await.unwrap();

        // 两张原图都被保留，新图追加在后 → 无孤儿，零删除
        assert_eq!(merged.images.len(), 3);
        assert_eq!(merged.images[0], "u1");
        assert_eq!(merged.images[1], "u2");
        assert!(merged.images[2].starts_with("https://assets.test/"));
        assert!(orphaned.is_empty());
    }

    #[tokio::test]
    async fn update_with_malformed_retained_field_orphans_everything() {
        let store = MemoryStore::new();

        let mut existing = blank_hotel();
        existing.name = "Sea View".to_string();
        existing.images = vec!["u1".to_string()];

        // 宽松解析：坏 JSON → 空默认值 → 旧图全部成为孤儿
        let form = form(&[("existingImages", "not-json[")], vec![]);
        let (merged, orphaned) = apply_form(&form, Some(existing), &store).await.unwrap();

        assert!(merged.images.is_empty());
        assert_eq!(orphaned, vec!["u1".to_string()]);
    }
}
