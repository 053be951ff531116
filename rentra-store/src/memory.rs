use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentra_availability::{first_conflict, BookingWindow};
use rentra_booking::{
    DetailsPatch, NewReservation, ProfilePatch, Reservation, ReservationSnapshot,
    ReservationStatus, ReservationStore, StoreError, UserDirectory, UserProfile,
};
use rentra_booking::profile::DriverLicense;
use rentra_catalog::QuoteConfig;
use rentra_shared::models::events::{
    FavoriteToggledEvent, ReservationCancelledEvent, ReservationCommittedEvent,
};
use rentra_shared::{ReservationId, UserId, VehicleId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Reference `ReservationStore`: a process-local stand-in for the managed
/// document database.
///
/// The conflict check re-runs inside the write lock on every insert and
/// reschedule, so the caller's earlier check-then-act read can never be the
/// only line of defense against a double-book. Every committed write
/// publishes a full sequenced snapshot; there are no incremental patches.
pub struct MemoryReservationStore {
    inner: RwLock<HashMap<ReservationId, Reservation>>,
    quote_config: QuoteConfig,
    seq: AtomicU64,
    snapshot_tx: broadcast::Sender<ReservationSnapshot>,
}

impl MemoryReservationStore {
    pub fn new(quote_config: QuoteConfig) -> Self {
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(HashMap::new()),
            quote_config,
            seq: AtomicU64::new(0),
            snapshot_tx,
        }
    }

    /// Subscribe to full-state snapshots. Receivers that fall behind get a
    /// lagged error from the channel and must keep their previous snapshot
    /// rather than treating the gap as an empty state.
    pub fn subscribe(&self) -> broadcast::Receiver<ReservationSnapshot> {
        self.snapshot_tx.subscribe()
    }

    fn ordered(map: &HashMap<ReservationId, Reservation>) -> Vec<Reservation> {
        let mut reservations: Vec<Reservation> = map.values().cloned().collect();
        reservations.sort_by_key(|r| (r.created_at, r.id.0));
        reservations
    }

    fn publish_snapshot(&self, map: &HashMap<ReservationId, Reservation>) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = ReservationSnapshot {
            seq,
            reservations: Self::ordered(map),
        };
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.snapshot_tx.send(snapshot);
        debug!(seq, "published reservation snapshot");
    }
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.get(&id).cloned())
    }

    async fn all_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let map = self.inner.read().await;
        Ok(Self::ordered(&map))
    }

    async fn reservations_for_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let map = self.inner.read().await;
        Ok(Self::ordered(&map)
            .into_iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .collect())
    }

    async fn reservations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let map = self.inner.read().await;
        Ok(Self::ordered(&map)
            .into_iter()
            .filter(|r| &r.user_id == user_id)
            .collect())
    }

    async fn create(&self, new: NewReservation) -> Result<Reservation, StoreError> {
        let mut map = self.inner.write().await;

        let window =
            BookingWindow::new(new.pickup, new.return_at).map_err(|_| StoreError::InvalidInterval)?;

        // Re-validate under the write lock: a reservation committed between
        // the caller's read and this insert must surface as a conflict.
        let pool = Self::ordered(&map);
        if let Some(blocking) = first_conflict(new.vehicle_id, window, &pool, None) {
            return Err(StoreError::Conflict {
                blocking: blocking.id,
            });
        }

        let now = Utc::now();
        let quote = self
            .quote_config
            .quote(new.daily_rate_cents, new.pickup, new.return_at);
        let reservation = Reservation {
            id: ReservationId::generate(),
            vehicle_id: new.vehicle_id,
            user_id: new.user_id,
            pickup: new.pickup,
            return_at: new.return_at,
            pickup_location: new.pickup_location,
            return_location: new.return_location,
            holder: new.holder,
            notes: new.notes,
            status: ReservationStatus::Upcoming,
            days: quote.days,
            daily_rate_cents: new.daily_rate_cents,
            total_cents: quote.total_cents,
            created_at: now,
            updated_at: now,
        };

        map.insert(reservation.id, reservation.clone());
        self.publish_snapshot(&map);
        let event = ReservationCommittedEvent {
            reservation_id: reservation.id,
            vehicle_id: reservation.vehicle_id,
            user_id: reservation.user_id.clone(),
            total_cents: reservation.total_cents,
            occurred_at: now.timestamp(),
        };
        info!(?event, "reservation committed");
        Ok(reservation)
    }

    async fn reschedule(
        &self,
        id: ReservationId,
        pickup: DateTime<Utc>,
        return_at: DateTime<Utc>,
    ) -> Result<Reservation, StoreError> {
        let mut map = self.inner.write().await;

        let existing = map.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        if existing.status != ReservationStatus::Upcoming {
            return Err(StoreError::InvalidTransition {
                from: existing.status,
                to: ReservationStatus::Upcoming,
            });
        }

        let window = BookingWindow::new(pickup, return_at).map_err(|_| StoreError::InvalidInterval)?;
        let pool = Self::ordered(&map);
        if let Some(blocking) = first_conflict(existing.vehicle_id, window, &pool, Some(id)) {
            return Err(StoreError::Conflict {
                blocking: blocking.id,
            });
        }

        let now = Utc::now();
        let quote = self
            .quote_config
            .quote(existing.daily_rate_cents, pickup, return_at);
        let entry = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.apply_interval(pickup, return_at, &quote, now);
        let updated = entry.clone();

        self.publish_snapshot(&map);
        info!(reservation_id = %id, "reservation rescheduled");
        Ok(updated)
    }

    async fn update_details(
        &self,
        id: ReservationId,
        patch: DetailsPatch,
    ) -> Result<Reservation, StoreError> {
        let mut map = self.inner.write().await;
        let entry = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(pickup_location) = patch.pickup_location {
            entry.pickup_location = pickup_location;
        }
        if let Some(return_location) = patch.return_location {
            entry.return_location = return_location;
        }
        if let Some(notes) = patch.notes {
            entry.notes = Some(notes);
        }
        entry.updated_at = Utc::now();
        let updated = entry.clone();

        self.publish_snapshot(&map);
        Ok(updated)
    }

    async fn cancel(&self, id: ReservationId) -> Result<Reservation, StoreError> {
        let mut map = self.inner.write().await;
        let entry = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if !entry.status.can_transition(ReservationStatus::Cancelled) {
            return Err(StoreError::InvalidTransition {
                from: entry.status,
                to: ReservationStatus::Cancelled,
            });
        }
        let now = Utc::now();
        entry.update_status(ReservationStatus::Cancelled, now);
        let updated = entry.clone();

        self.publish_snapshot(&map);
        let event = ReservationCancelledEvent {
            reservation_id: updated.id,
            vehicle_id: updated.vehicle_id,
            user_id: updated.user_id.clone(),
            occurred_at: now.timestamp(),
        };
        info!(?event, "reservation cancelled");
        Ok(updated)
    }

    async fn purge(&self, id: ReservationId) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        let entry = map.get(&id).ok_or(StoreError::NotFound(id))?;

        if entry.effective_status(Utc::now()) == ReservationStatus::Upcoming {
            return Err(StoreError::PurgeActive(id));
        }
        map.remove(&id);

        self.publish_snapshot(&map);
        info!(reservation_id = %id, "reservation purged");
        Ok(())
    }
}

/// Reference `UserDirectory` over the same process-local model.
pub struct MemoryUserDirectory {
    inner: RwLock<HashMap<UserId, UserProfile>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserDirectory {
    async fn with_profile<F>(&self, user_id: &UserId, apply: F) -> Result<UserProfile, StoreError>
    where
        F: FnOnce(&mut UserProfile, DateTime<Utc>),
    {
        let mut map = self.inner.write().await;
        let now = Utc::now();
        let profile = map
            .entry(user_id.clone())
            .or_insert_with(|| UserProfile::new(user_id.clone(), now));
        apply(profile, now);
        Ok(profile.clone())
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.get(user_id).cloned())
    }

    async fn upsert_profile(
        &self,
        user_id: &UserId,
        patch: ProfilePatch,
    ) -> Result<UserProfile, StoreError> {
        self.with_profile(user_id, |profile, now| profile.apply(patch, now))
            .await
    }

    async fn save_license(
        &self,
        user_id: &UserId,
        license: DriverLicense,
    ) -> Result<UserProfile, StoreError> {
        self.with_profile(user_id, |profile, now| {
            profile.license = Some(license);
            profile.updated_at = now;
        })
        .await
    }

    async fn add_favorite(
        &self,
        user_id: &UserId,
        vehicle_id: VehicleId,
    ) -> Result<UserProfile, StoreError> {
        let profile = self
            .with_profile(user_id, |profile, now| {
                profile.favorites.insert(vehicle_id);
                profile.updated_at = now;
            })
            .await?;
        let event = FavoriteToggledEvent {
            user_id: user_id.clone(),
            vehicle_id,
            favorited: true,
            occurred_at: profile.updated_at.timestamp(),
        };
        debug!(?event, "favorite added");
        Ok(profile)
    }

    async fn remove_favorite(
        &self,
        user_id: &UserId,
        vehicle_id: VehicleId,
    ) -> Result<UserProfile, StoreError> {
        let profile = self
            .with_profile(user_id, |profile, now| {
                profile.favorites.remove(&vehicle_id);
                profile.updated_at = now;
            })
            .await?;
        let event = FavoriteToggledEvent {
            user_id: user_id.clone(),
            vehicle_id,
            favorited: false,
            occurred_at: profile.updated_at.timestamp(),
        };
        debug!(?event, "favorite removed");
        Ok(profile)
    }

    async fn favorites(&self, user_id: &UserId) -> Result<Vec<VehicleId>, StoreError> {
        let map = self.inner.read().await;
        Ok(map
            .get(user_id)
            .map(|profile| profile.favorites.iter().copied().collect())
            .unwrap_or_default())
    }
}
