use chrono::{DateTime, Utc};
use rentra_catalog::RentalQuote;
use rentra_shared::{Redacted, ReservationId, UserId, VehicleId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Allowed transitions: Upcoming -> Completed, Upcoming -> Cancelled.
    /// Completed and Cancelled are terminal.
    pub fn can_transition(self, to: ReservationStatus) -> bool {
        matches!(
            (self, to),
            (ReservationStatus::Upcoming, ReservationStatus::Completed)
                | (ReservationStatus::Upcoming, ReservationStatus::Cancelled)
        )
    }
}

/// Renter contact details, carried for display only. Phone and email are
/// wrapped so they cannot leak through Debug-formatted logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderContact {
    pub name: String,
    pub phone: Redacted<String>,
    pub email: Redacted<String>,
}

/// A booking of a specific vehicle for a specific interval by a specific
/// user. Instants are UTC; the interval is half-open `[pickup, return_at)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub vehicle_id: VehicleId,
    pub user_id: UserId,
    pub pickup: DateTime<Utc>,
    pub return_at: DateTime<Utc>,
    pub pickup_location: String,
    pub return_location: String,
    pub holder: HolderContact,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    pub days: i64,
    pub daily_rate_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// A reservation participates in conflict checks unless cancelled.
    pub fn is_active(&self) -> bool {
        self.status != ReservationStatus::Cancelled
    }

    /// Stored status, with completion inferred once the return instant is in
    /// the past. Some flows set Completed explicitly; most never do.
    pub fn effective_status(&self, now: DateTime<Utc>) -> ReservationStatus {
        if self.status == ReservationStatus::Upcoming && self.return_at < now {
            ReservationStatus::Completed
        } else {
            self.status
        }
    }

    /// Re-derive the financial fields after an interval change.
    pub fn apply_interval(
        &mut self,
        pickup: DateTime<Utc>,
        return_at: DateTime<Utc>,
        quote: &RentalQuote,
        now: DateTime<Utc>,
    ) {
        self.pickup = pickup;
        self.return_at = return_at;
        self.days = quote.days;
        self.total_cents = quote.total_cents;
        self.updated_at = now;
    }

    pub fn update_status(&mut self, status: ReservationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

/// Listing tabs from the bookings screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingTab {
    Upcoming,
    Completed,
    Cancelled,
}

impl BookingTab {
    pub fn matches(self, reservation: &Reservation, now: DateTime<Utc>) -> bool {
        match self {
            BookingTab::Upcoming => {
                reservation.effective_status(now) == ReservationStatus::Upcoming
            }
            BookingTab::Completed => {
                reservation.effective_status(now) == ReservationStatus::Completed
            }
            BookingTab::Cancelled => reservation.status == ReservationStatus::Cancelled,
        }
    }
}
