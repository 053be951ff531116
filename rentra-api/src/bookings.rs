use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use rentra_availability::{compose_instant, normalize_twelve_hour, validate, Decision, DraftBooking};
use rentra_booking::repository::bookings_key;
use rentra_booking::{
    BookingTab, DetailsPatch, HolderContact, MirrorCache, NewReservation, Reservation,
    ReservationStore, StoreError,
};
use rentra_shared::{Redacted, ReservationId, UserId, VehicleId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route(
            "/v1/bookings/{id}",
            get(get_booking).put(update_booking).delete(purge_booking),
        )
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
        .route("/v1/users/{user_id}/bookings", get(list_user_bookings))
}

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    user_id: String,
    vehicle_id: u32,
    pickup_date: NaiveDate,
    /// 12-hour wall-clock strings, as captured by the pickers. Garbage
    /// degrades to midnight rather than failing the request.
    pickup_time: String,
    return_date: NaiveDate,
    return_time: String,
    pickup_location: String,
    return_location: String,
    driver_name: String,
    driver_phone: String,
    driver_email: String,
    #[serde(default)]
    notes: Option<String>,
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = state
        .fleet
        .get(VehicleId(req.vehicle_id))
        .cloned()
        .ok_or_else(|| AppError::NotFoundError(format!("Vehicle not found: {}", req.vehicle_id)))?;

    let pickup = compose_instant(req.pickup_date, normalize_twelve_hour(&req.pickup_time));
    let return_at = compose_instant(req.return_date, normalize_twelve_hour(&req.return_time));

    // The pool is scoped by vehicle across all users; per-user scoping here
    // would silently ignore everyone else's bookings.
    let pool = state.store.reservations_for_vehicle(vehicle.id).await?;
    let draft = DraftBooking {
        vehicle_id: vehicle.id,
        pickup,
        return_at,
    };
    if let Decision::Rejected(rejection) = validate(&draft, &pool, None, Utc::now()) {
        info!(vehicle_id = %vehicle.id, ?rejection, "booking draft rejected");
        return Err(AppError::BookingRejected(rejection));
    }

    // The store re-validates under its write lock, so a reservation that
    // landed since the read above still surfaces as a conflict.
    let reservation = state
        .store
        .create(NewReservation {
            user_id: UserId::new(req.user_id),
            vehicle_id: vehicle.id,
            pickup,
            return_at,
            pickup_location: req.pickup_location,
            return_location: req.return_location,
            holder: HolderContact {
                name: req.driver_name,
                phone: Redacted::new(req.driver_phone),
                email: Redacted::new(req.driver_email),
            },
            notes: req.notes,
            daily_rate_cents: vehicle.price_per_day_cents,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<Json<Reservation>, AppError> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", id)))
}

#[derive(Debug, Deserialize)]
struct UpdateBookingRequest {
    pickup_date: NaiveDate,
    pickup_time: String,
    return_date: NaiveDate,
    return_time: String,
    #[serde(default)]
    pickup_location: Option<String>,
    #[serde(default)]
    return_location: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Edit flow: the same validation path as creation, excluding the booking's
/// own id so it never conflicts with its prior state. The quote is
/// recomputed by the store when the interval changes.
async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<Reservation>, AppError> {
    let existing = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", id)))?;

    let pickup = compose_instant(req.pickup_date, normalize_twelve_hour(&req.pickup_time));
    let return_at = compose_instant(req.return_date, normalize_twelve_hour(&req.return_time));

    let pool = state
        .store
        .reservations_for_vehicle(existing.vehicle_id)
        .await?;
    let draft = DraftBooking {
        vehicle_id: existing.vehicle_id,
        pickup,
        return_at,
    };
    if let Decision::Rejected(rejection) = validate(&draft, &pool, Some(id), Utc::now()) {
        info!(reservation_id = %id, ?rejection, "reschedule rejected");
        return Err(AppError::BookingRejected(rejection));
    }

    let mut updated = state.store.reschedule(id, pickup, return_at).await?;

    let patch = DetailsPatch {
        pickup_location: req.pickup_location,
        return_location: req.return_location,
        notes: req.notes,
    };
    if patch.pickup_location.is_some() || patch.return_location.is_some() || patch.notes.is_some() {
        updated = state.store.update_details(id, patch).await?;
    }

    Ok(Json(updated))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<Json<Reservation>, AppError> {
    let cancelled = state.store.cancel(id).await?;
    Ok(Json(cancelled))
}

async fn purge_booking(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<StatusCode, AppError> {
    state.store.purge(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    tab: Option<BookingTab>,
}

#[derive(Debug, Serialize)]
struct BookingListResponse {
    /// "live" for store reads, "mirror" for the offline fallback.
    source: &'static str,
    bookings: Vec<Reservation>,
}

async fn list_user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<BookingListResponse>, AppError> {
    let user = UserId::new(user_id);
    let now = Utc::now();

    let (source, bookings) = match state.store.reservations_for_user(&user).await {
        Ok(bookings) => ("live", bookings),
        // Stale reads are acceptable for display, never for validation.
        Err(StoreError::Unavailable(msg)) => {
            warn!(user_id = %user, error = %msg, "store unreachable, trying mirror cache");
            ("mirror", read_mirror_bookings(&state, &user).await?)
        }
        Err(other) => return Err(other.into()),
    };

    let bookings = match params.tab {
        Some(tab) => bookings
            .into_iter()
            .filter(|r| tab.matches(r, now))
            .collect(),
        None => bookings,
    };

    Ok(Json(BookingListResponse { source, bookings }))
}

async fn read_mirror_bookings(
    state: &AppState,
    user: &UserId,
) -> Result<Vec<Reservation>, AppError> {
    let mirror = state
        .mirror
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("no mirror cache configured".to_string()))?;

    match mirror.get(&bookings_key(user)).await? {
        Some(payload) => serde_json::from_str(&payload)
            .map_err(|e| AppError::Anyhow(anyhow::anyhow!("corrupt mirror entry: {}", e))),
        None => Ok(Vec::new()),
    }
}
