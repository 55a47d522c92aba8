//! Authentication Handlers
//!
//! Handles admin login and password changes

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::Admin;
use crate::db::repository::AdminRepository;
use crate::security_log;
use crate::utils::validation::{MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminInfo,
}

/// Admin information returned after login
#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: String,
    pub username: String,
}

/// Change-password request payload
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Login handler
///
/// Verifies the admin credential and issues a session token with a fixed
/// one-day expiry. The token payload carries only the admin identifier.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = AdminRepository::new(state.get_db());

    let admin = repo
        .find_by_username(&req.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_valid = admin
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        security_log!("WARN", "login_failed", username = req.username.clone());
        return Err(AppError::invalid_credentials());
    }

    let admin_id = admin.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = state
        .jwt_service()
        .generate_token(&admin_id, &admin.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        admin_id = %admin_id,
        username = %admin.username,
        "Admin logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: AdminInfo {
            id: admin_id,
            username: admin.username,
        },
    }))
}

/// Change-password handler
///
/// Requires a valid session token. Verifies the old password, then
/// overwrites the stored hash. Outstanding tokens stay valid until expiry.
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentAdmin>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<bool>> {
    validate_required_text(&req.new_password, "new_password", MAX_PASSWORD_LEN)?;

    let repo = AdminRepository::new(state.get_db());

    let admin = repo
        .find()
        .await?
        .ok_or_else(|| AppError::not_found("Admin credential".to_string()))?;

    let old_valid = admin
        .verify_password(&req.old_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !old_valid {
        security_log!(
            "WARN",
            "change_password_rejected",
            username = current.username.clone()
        );
        return Err(AppError::validation("Old password is incorrect".to_string()));
    }

    let new_hash = Admin::hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let admin_id = admin.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    repo.update_password(&admin_id, &new_hash).await?;

    tracing::info!(username = %current.username, "Admin password changed");

    Ok(Json(true))
}
