use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rentra_availability::{available_vehicles, day_range_window, first_conflict, BookingWindow};
use rentra_availability::{compose_instant, normalize_twelve_hour};
use rentra_booking::ReservationStore;
use rentra_catalog::{CatalogSource, Vehicle};
use rentra_shared::{ReservationId, VehicleId};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/vehicles", get(list_vehicles))
        .route("/v1/vehicles/{id}", get(get_vehicle))
        .route("/v1/vehicles/{id}/availability", get(probe_availability))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// Catalog listing, optionally narrowed to vehicles free for an inclusive
/// day range. The coarse day-level window blocks a vehicle for any
/// partial-day overlap.
async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    match (params.start, params.end) {
        (None, None) => Ok(Json(state.fleet.all_vehicles().await?)),
        (Some(start), Some(end)) => {
            let window = day_range_window(start, end).map_err(|_| {
                AppError::ValidationError("end date must not precede start date".to_string())
            })?;
            let catalog = state.fleet.all_vehicles().await?;
            let pool = state.store.all_reservations().await?;
            let available: Vec<Vehicle> = available_vehicles(&catalog, window, &pool)
                .into_iter()
                .cloned()
                .collect();
            Ok(Json(available))
        }
        _ => Err(AppError::ValidationError(
            "start and end dates must be provided together".to_string(),
        )),
    }
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Vehicle>, AppError> {
    state
        .fleet
        .vehicle(VehicleId(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Vehicle not found: {}", id)))
}

#[derive(Debug, Deserialize)]
struct ProbeParams {
    pickup_date: NaiveDate,
    pickup_time: String,
    return_date: NaiveDate,
    return_time: String,
    exclude: Option<ReservationId>,
}

#[derive(Debug, Serialize)]
struct ProbeResponse {
    available: bool,
    blocking: Option<ReservationId>,
}

/// Exact-time availability probe for one vehicle, the same check the
/// booking-commit path runs.
async fn probe_availability(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(params): Query<ProbeParams>,
) -> Result<Json<ProbeResponse>, AppError> {
    let vehicle_id = VehicleId(id);
    if state.fleet.get(vehicle_id).is_none() {
        return Err(AppError::NotFoundError(format!("Vehicle not found: {}", id)));
    }

    let pickup = compose_instant(params.pickup_date, normalize_twelve_hour(&params.pickup_time));
    let return_at = compose_instant(params.return_date, normalize_twelve_hour(&params.return_time));
    let window = BookingWindow::new(pickup, return_at)
        .map_err(|_| AppError::ValidationError("return must be after pickup".to_string()))?;

    let pool = state.store.reservations_for_vehicle(vehicle_id).await?;
    let blocking = first_conflict(vehicle_id, window, &pool, params.exclude).map(|r| r.id);

    tracing::debug!(vehicle_id = %vehicle_id, available = blocking.is_none(), "availability probe");
    Ok(Json(ProbeResponse {
        available: blocking.is_none(),
        blocking,
    }))
}
