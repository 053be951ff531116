use crate::conflict::{first_conflict, BookingWindow};
use chrono::{DateTime, Utc};
use rentra_booking::Reservation;
use rentra_shared::{ReservationId, VehicleId};
use serde::Serialize;

/// A user-entered booking attempt, already normalized to absolute instants
/// but not yet checked.
#[derive(Debug, Clone, Copy)]
pub struct DraftBooking {
    pub vehicle_id: VehicleId,
    pub pickup: DateTime<Utc>,
    pub return_at: DateTime<Utc>,
}

/// Why a draft was not accepted. Rejection is an expected, named outcome the
/// caller branches on, never an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// `pickup >= return_at`; checked before the pool is consulted.
    EmptyInterval,
    /// New bookings cannot start in the past. Edits of an existing booking
    /// skip this check.
    PickupInPast,
    /// The interval collides with an active reservation. The blocking id is
    /// diagnostic; callers decide whether to surface it.
    Conflict { blocking: ReservationId },
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::EmptyInterval => "Return must be after pickup.",
            Rejection::PickupInPast => "Pickup cannot be in the past.",
            Rejection::Conflict { .. } => {
                "This vehicle is already reserved for the selected dates and times."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted { window: BookingWindow },
    Rejected(Rejection),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }
}

/// Run a draft through the full validation path: interval sanity, then the
/// conflict check against the supplied pool. `exclude` carries the booking's
/// own id when editing so it never conflicts with its prior state; its
/// presence also marks the draft as an edit, which may keep its original
/// (now past) pickup instant.
///
/// Pure over its inputs: `now` is passed in, nothing is fetched, and the same
/// snapshot always yields the same decision.
pub fn validate(
    draft: &DraftBooking,
    pool: &[Reservation],
    exclude: Option<ReservationId>,
    now: DateTime<Utc>,
) -> Decision {
    let window = match BookingWindow::new(draft.pickup, draft.return_at) {
        Ok(window) => window,
        Err(_) => return Decision::Rejected(Rejection::EmptyInterval),
    };

    if exclude.is_none() && draft.pickup < now {
        return Decision::Rejected(Rejection::PickupInPast);
    }

    match first_conflict(draft.vehicle_id, window, pool, exclude) {
        Some(blocking) => Decision::Rejected(Rejection::Conflict {
            blocking: blocking.id,
        }),
        None => Decision::Accepted { window },
    }
}
