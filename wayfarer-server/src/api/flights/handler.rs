//! Flight API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;

use crate::api::forms::{CollectedForm, upload_files};
use crate::core::ServerState;
use crate::db::models::Flight;
use crate::db::repository::{FlightRepository, FlightSearch};
use crate::media::{ObjectStore, purge_assets, reconcile};
use crate::utils::time::now_millis;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

const MEDIA_FOLDER: &str = "flights";

/// 公共航班搜索参数
#[derive(Debug, Deserialize)]
pub struct FlightSearchQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
}

/// GET /api/admin/flights - 获取所有航班
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Flight>>> {
    let repo = FlightRepository::new(state.get_db());
    let flights = repo.find_all().await?;
    Ok(Json(flights))
}

/// GET /api/admin/flights/:id - 获取单个航班
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Flight>> {
    let repo = FlightRepository::new(state.get_db());
    let flight = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Flight {}", id)))?;
    Ok(Json(flight))
}

/// POST /api/admin/flights - 创建航班 (multipart)
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<Flight>> {
    let form = CollectedForm::from_multipart(multipart).await?;
    let (flight, _orphaned) = apply_form(&form, None, state.media.as_ref()).await?;

    let repo = FlightRepository::new(state.get_db());
    let created = repo.create(flight).await?;

    tracing::info!(
        airline = %created.airline,
        route = %format!("{} -> {}", created.departure_city, created.arrival_city),
        "Flight created"
    );

    Ok(Json(created))
}

/// PUT /api/admin/flights/:id - 更新航班 (multipart)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Flight>> {
    let repo = FlightRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Flight {}", id)))?;

    let form = CollectedForm::from_multipart(multipart).await?;
    let (merged, orphaned) = apply_form(&form, Some(existing), state.media.as_ref()).await?;

    let outcome = purge_assets(state.media.as_ref(), &orphaned).await;
    if outcome.failed > 0 {
        tracing::warn!(failed = outcome.failed, "Some orphan deletions failed during flight update");
    }

    let updated = repo.replace(&id, merged).await?;
    Ok(Json(updated))
}

/// DELETE /api/admin/flights/:id - 删除航班
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = FlightRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Flight {}", id)))?;

    let refs: Vec<String> = existing.logo.clone().into_iter().collect();
    purge_assets(state.media.as_ref(), &refs).await;

    repo.delete(&id).await?;
    Ok(Json(true))
}

/// GET /api/flights/search - 公共航班搜索
pub async fn search(
    State(state): State<ServerState>,
    Query(q): Query<FlightSearchQuery>,
) -> AppResult<Json<Vec<Flight>>> {
    let repo = FlightRepository::new(state.get_db());
    let flights = repo
        .search(&FlightSearch {
            from: q.from,
            to: q.to,
            date: q.date,
        })
        .await?;
    Ok(Json(flights))
}

// =============================================================================
// Form assembly
// =============================================================================

fn blank_flight() -> Flight {
    Flight {
        id: None,
        airline: String::new(),
        flight_number: String::new(),
        departure_city: String::new(),
        arrival_city: String::new(),
        departure_date: String::new(),
        departure_time: String::new(),
        arrival_time: String::new(),
        price: 0.0,
        seats: 0,
        logo: None,
        created_at: 0,
        updated_at: 0,
    }
}

/// Apply a multipart form onto an existing flight (or a blank one for
/// create). Returns the merged record plus the orphaned logo reference.
async fn apply_form(
    form: &CollectedForm,
    existing: Option<Flight>,
    store: &dyn ObjectStore,
) -> AppResult<(Flight, Vec<String>)> {
    let is_create = existing.is_none();
    if is_create {
        form.require_fields(&[
            "airline",
            "departureCity",
            "arrivalCity",
            "departureDate",
            "price",
        ])?;
    }

    let mut flight = existing.unwrap_or_else(blank_flight);

    if let Some(v) = form.text("airline") {
        flight.airline = v.to_string();
    }
    if let Some(v) = form.text("flightNumber") {
        flight.flight_number = v.to_string();
    }
    if let Some(v) = form.text("departureCity") {
        flight.departure_city = v.to_string();
    }
    if let Some(v) = form.text("arrivalCity") {
        flight.arrival_city = v.to_string();
    }
    if let Some(v) = form.text("departureDate") {
        flight.departure_date = v.to_string();
    }
    if let Some(v) = form.text("departureTime") {
        flight.departure_time = v.to_string();
    }
    if let Some(v) = form.text("arrivalTime") {
        flight.arrival_time = v.to_string();
    }
    if let Some(v) = form.f64_field("price")? {
        flight.price = v;
    }
    if let Some(v) = form.i32_field("seats")? {
        flight.seats = v;
    }

    validate_required_text(&flight.airline, "airline", MAX_NAME_LEN)?;

    // 航司 logo (容量 1)：retained 来自 existingLogo 字段
    let retained: Vec<String> = form
        .text("existingLogo")
        .filter(|s| !s.trim().is_empty())
        .map(|s| vec![s.to_string()])
        .unwrap_or_default();
    let logo_files = form.files("logo");
    let new_logo = upload_files(store, &logo_files[..logo_files.len().min(1)], MEDIA_FOLDER).await?;
    let existing_logo: Vec<String> = flight.logo.clone().into_iter().collect();
    let merged = reconcile(&existing_logo, &retained, new_logo, Some(1));

    flight.logo = merged.new_set.into_iter().next();

    let now = now_millis();
    if is_create {
        flight.created_at = now;
    }
    flight.updated_at = now;

    Ok((flight, merged.orphaned))
}
