use crate::profile::{DriverLicense, ProfilePatch, UserProfile};
use crate::reservation::{HolderContact, Reservation, ReservationStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentra_shared::{ReservationId, UserId, VehicleId};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Expected outcome, not a failure: the requested interval collides with
    /// an active reservation. Carries the blocking id for diagnostics.
    #[error("Vehicle already reserved; blocked by reservation {blocking}")]
    Conflict { blocking: ReservationId },

    #[error("Reservation interval is empty or negative")]
    InvalidInterval,

    #[error("Reservation not found: {0}")]
    NotFound(ReservationId),

    #[error("Invalid status transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Reservation {0} is still active and cannot be purged")]
    PurgeActive(ReservationId),

    /// Retryable: the backing store could not be reached. Callers may fall
    /// back to the mirror cache for reads, never for write-path validation.
    #[error("Reservation store unavailable: {0}")]
    Unavailable(String),
}

/// Input for reservation creation. The store assigns the id, stamps the
/// timestamps, and derives the financial fields.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReservation {
    pub user_id: UserId,
    pub vehicle_id: VehicleId,
    pub pickup: DateTime<Utc>,
    pub return_at: DateTime<Utc>,
    pub pickup_location: String,
    pub return_location: String,
    pub holder: HolderContact,
    pub notes: Option<String>,
    pub daily_rate_cents: i64,
}

/// Display-only field edits; interval changes go through `reschedule` so the
/// conflict check and quote recomputation cannot be skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsPatch {
    pub pickup_location: Option<String>,
    pub return_location: Option<String>,
    pub notes: Option<String>,
}

/// One full-state notification. Consumers replace their entire view with the
/// newest snapshot; `seq` is strictly increasing so stale deliveries can be
/// dropped instead of merged.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationSnapshot {
    pub seq: u64,
    pub reservations: Vec<Reservation>,
}

impl ReservationSnapshot {
    pub fn for_user(&self, user_id: &UserId) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|r| &r.user_id == user_id)
            .collect()
    }
}

/// Persistence contract for reservations. Candidate pools for availability
/// checks are fetched by vehicle, across all users; per-user queries exist
/// for listing screens only.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError>;

    /// Every reservation in the store, in a stable order. The day-level
    /// browse filter checks the whole catalog in one pass.
    async fn all_reservations(&self) -> Result<Vec<Reservation>, StoreError>;

    async fn reservations_for_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Vec<Reservation>, StoreError>;

    async fn reservations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// Validated insert. Implementations must re-run the conflict check
    /// atomically with the write; a late-arriving conflict is returned as
    /// `StoreError::Conflict`, never silently double-booked.
    async fn create(&self, new: NewReservation) -> Result<Reservation, StoreError>;

    /// Move an existing reservation to a new interval, excluding it from its
    /// own conflict check, and recompute the quote.
    async fn reschedule(
        &self,
        id: ReservationId,
        pickup: DateTime<Utc>,
        return_at: DateTime<Utc>,
    ) -> Result<Reservation, StoreError>;

    async fn update_details(
        &self,
        id: ReservationId,
        patch: DetailsPatch,
    ) -> Result<Reservation, StoreError>;

    async fn cancel(&self, id: ReservationId) -> Result<Reservation, StoreError>;

    /// Physical deletion; only allowed once the reservation is no longer
    /// upcoming.
    async fn purge(&self, id: ReservationId) -> Result<(), StoreError>;
}

/// User profile, license, and favorites persistence.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Merge-style upsert: creates the profile if absent.
    async fn upsert_profile(
        &self,
        user_id: &UserId,
        patch: ProfilePatch,
    ) -> Result<UserProfile, StoreError>;

    async fn save_license(
        &self,
        user_id: &UserId,
        license: DriverLicense,
    ) -> Result<UserProfile, StoreError>;

    async fn add_favorite(
        &self,
        user_id: &UserId,
        vehicle_id: VehicleId,
    ) -> Result<UserProfile, StoreError>;

    async fn remove_favorite(
        &self,
        user_id: &UserId,
        vehicle_id: VehicleId,
    ) -> Result<UserProfile, StoreError>;

    async fn favorites(&self, user_id: &UserId) -> Result<Vec<VehicleId>, StoreError>;
}

/// Device-local key-value mirror. A fallback read path when the live store is
/// unreachable; never the system of record.
#[async_trait]
pub trait MirrorCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub fn bookings_key(user_id: &UserId) -> String {
    format!("bookings:{}", user_id)
}

pub fn favorites_key(user_id: &UserId) -> String {
    format!("favorites:{}", user_id)
}

pub fn profile_key(user_id: &UserId) -> String {
    format!("profile:{}", user_id)
}
