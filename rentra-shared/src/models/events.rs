use crate::ids::{ReservationId, UserId, VehicleId};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationCommittedEvent {
    pub reservation_id: ReservationId,
    pub vehicle_id: VehicleId,
    pub user_id: UserId,
    pub total_cents: i64,
    pub occurred_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationCancelledEvent {
    pub reservation_id: ReservationId,
    pub vehicle_id: VehicleId,
    pub user_id: UserId,
    pub occurred_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct FavoriteToggledEvent {
    pub user_id: UserId,
    pub vehicle_id: VehicleId,
    pub favorited: bool,
    pub occurred_at: i64,
}
