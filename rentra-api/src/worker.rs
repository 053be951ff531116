use rentra_booking::repository::bookings_key;
use rentra_booking::{MirrorCache, Reservation, ReservationSnapshot};
use rentra_shared::UserId;
use rentra_store::MemoryReservationStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Folds the store's snapshot stream into the mirror cache so each user has
/// an offline copy of their bookings.
///
/// Snapshots are applied last-write-wins by sequence number; an older or
/// duplicate delivery is dropped, and a lagged receive keeps the previous
/// mirror state instead of wiping it.
pub async fn start_mirror_sync(store: Arc<MemoryReservationStore>, mirror: Arc<dyn MirrorCache>) {
    let mut rx = store.subscribe();
    let mut last_seq: u64 = 0;

    info!("Mirror sync worker started");

    loop {
        match rx.recv().await {
            Ok(snapshot) => {
                if snapshot.seq <= last_seq {
                    debug!(seq = snapshot.seq, last_seq, "stale snapshot dropped");
                    continue;
                }
                last_seq = snapshot.seq;
                sync_snapshot(mirror.as_ref(), &snapshot).await;
            }
            Err(RecvError::Lagged(missed)) => {
                warn!(missed, "snapshot stream lagged, keeping previous mirror state");
            }
            Err(RecvError::Closed) => {
                info!("Snapshot stream closed, mirror sync stopping");
                break;
            }
        }
    }
}

async fn sync_snapshot(mirror: &dyn MirrorCache, snapshot: &ReservationSnapshot) {
    let mut by_user: HashMap<&UserId, Vec<&Reservation>> = HashMap::new();
    for reservation in &snapshot.reservations {
        by_user
            .entry(&reservation.user_id)
            .or_default()
            .push(reservation);
    }

    for (user, bookings) in by_user {
        let payload = match serde_json::to_string(&bookings) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(user_id = %user, error = %err, "failed to serialize mirror payload");
                continue;
            }
        };
        if let Err(err) = mirror.set(&bookings_key(user), &payload).await {
            warn!(user_id = %user, error = %err, "failed to write mirror entry");
        }
    }
    debug!(seq = snapshot.seq, "mirror synced");
}
