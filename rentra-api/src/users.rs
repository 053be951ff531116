use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use rentra_booking::{DriverLicense, LicenseStatus, ProfilePatch, UserDirectory, UserProfile};
use rentra_shared::{Redacted, UserId, VehicleId};
use serde::Deserialize;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/users/{user_id}/profile",
            get(get_profile).put(update_profile),
        )
        .route("/v1/users/{user_id}/license", put(save_license))
        .route("/v1/users/{user_id}/favorites", get(list_favorites))
        .route(
            "/v1/users/{user_id}/favorites/{vehicle_id}",
            put(add_favorite).delete(remove_favorite),
        )
}

async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let user = UserId::new(user_id);
    state
        .directory
        .profile(&user)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("User not found: {}", user)))
}

async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserProfile>, AppError> {
    let user = UserId::new(user_id);
    let profile = state.directory.upsert_profile(&user, patch).await?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
struct LicenseRequest {
    number: String,
    holder_name: String,
    expires_on: NaiveDate,
    /// Verification happens out of band; new records start Pending.
    #[serde(default)]
    status: Option<LicenseStatus>,
}

async fn save_license(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<LicenseRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let user = UserId::new(user_id);
    let license = DriverLicense {
        number: Redacted::new(req.number),
        holder_name: req.holder_name,
        expires_on: req.expires_on,
        status: req.status.unwrap_or(LicenseStatus::Pending),
    };
    let profile = state.directory.save_license(&user, license).await?;
    info!(user_id = %user, "driver license saved");
    Ok(Json(profile))
}

async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<VehicleId>>, AppError> {
    let user = UserId::new(user_id);
    let favorites = state.directory.favorites(&user).await?;
    Ok(Json(favorites))
}

async fn add_favorite(
    State(state): State<AppState>,
    Path((user_id, vehicle_id)): Path<(String, u32)>,
) -> Result<Json<Vec<VehicleId>>, AppError> {
    let vehicle_id = VehicleId(vehicle_id);
    if state.fleet.get(vehicle_id).is_none() {
        return Err(AppError::NotFoundError(format!(
            "Vehicle not found: {}",
            vehicle_id
        )));
    }
    let user = UserId::new(user_id);
    let profile = state.directory.add_favorite(&user, vehicle_id).await?;
    Ok(Json(profile.favorites.into_iter().collect()))
}

async fn remove_favorite(
    State(state): State<AppState>,
    Path((user_id, vehicle_id)): Path<(String, u32)>,
) -> Result<Json<Vec<VehicleId>>, AppError> {
    let user = UserId::new(user_id);
    let profile = state
        .directory
        .remove_favorite(&user, VehicleId(vehicle_id))
        .await?;
    Ok(Json(profile.favorites.into_iter().collect()))
}
