use chrono::{DateTime, Utc};
use rentra_booking::Reservation;
use rentra_shared::{ReservationId, VehicleId};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("window start must be strictly before its end")]
    Empty,
}

/// A half-open interval `[start, end)`. Touching endpoints do not overlap,
/// which is what permits back-to-back same-instant handoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if start >= end {
            return Err(WindowError::Empty);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && self.end > other.start
    }

    fn overlaps_reservation(&self, reservation: &Reservation) -> bool {
        self.start < reservation.return_at && self.end > reservation.pickup
    }
}

/// Find the first active reservation for `vehicle_id` whose interval
/// overlaps `window`, skipping `exclude` so an edit never conflicts with the
/// booking's own prior state.
///
/// Pool order determines which conflict is reported; existence is what
/// callers branch on, so the search short-circuits. Cancelled reservations
/// and other vehicles' reservations never participate.
pub fn first_conflict<'a>(
    vehicle_id: VehicleId,
    window: BookingWindow,
    pool: &'a [Reservation],
    exclude: Option<ReservationId>,
) -> Option<&'a Reservation> {
    pool.iter().find(|reservation| {
        reservation.vehicle_id == vehicle_id
            && reservation.is_active()
            && exclude != Some(reservation.id)
            && window.overlaps_reservation(reservation)
    })
}

pub fn is_vehicle_available(
    vehicle_id: VehicleId,
    window: BookingWindow,
    pool: &[Reservation],
    exclude: Option<ReservationId>,
) -> bool {
    first_conflict(vehicle_id, window, pool, exclude).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rentra_booking::{HolderContact, ReservationStatus};
    use rentra_shared::{Redacted, UserId};

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn reservation(
        vehicle: u32,
        pickup: DateTime<Utc>,
        return_at: DateTime<Utc>,
        status: ReservationStatus,
    ) -> Reservation {
        Reservation {
            id: ReservationId::generate(),
            vehicle_id: VehicleId(vehicle),
            user_id: UserId::new("renter@example.com"),
            pickup,
            return_at,
            pickup_location: "Downtown".to_string(),
            return_location: "Downtown".to_string(),
            holder: HolderContact {
                name: "Alex Doe".to_string(),
                phone: Redacted::new("555-0100".to_string()),
                email: Redacted::new("renter@example.com".to_string()),
            },
            notes: None,
            status,
            days: 2,
            daily_rate_cents: 4500,
            total_cents: 13200,
            created_at: instant(2024, 5, 1, 0, 0),
            updated_at: instant(2024, 5, 1, 0, 0),
        }
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> BookingWindow {
        BookingWindow::new(start, end).unwrap()
    }

    #[test]
    fn test_empty_window_rejected() {
        let at = instant(2024, 6, 1, 9, 0);
        assert_eq!(BookingWindow::new(at, at), Err(WindowError::Empty));
        assert!(BookingWindow::new(at, at - chrono::Duration::hours(1)).is_err());
    }

    #[test]
    fn test_boundary_touch_is_not_a_conflict() {
        // Existing [06-01 09:00, 06-03 09:00); request starts exactly at the
        // return instant.
        let existing = reservation(
            1,
            instant(2024, 6, 1, 9, 0),
            instant(2024, 6, 3, 9, 0),
            ReservationStatus::Upcoming,
        );
        let pool = vec![existing];

        let touching = window(instant(2024, 6, 3, 9, 0), instant(2024, 6, 5, 9, 0));
        assert!(is_vehicle_available(VehicleId(1), touching, &pool, None));

        let one_minute_in = window(instant(2024, 6, 3, 8, 59), instant(2024, 6, 5, 9, 0));
        assert!(!is_vehicle_available(VehicleId(1), one_minute_in, &pool, None));
    }

    #[test]
    fn test_contained_interval_conflicts() {
        let existing = reservation(
            1,
            instant(2024, 6, 1, 9, 0),
            instant(2024, 6, 3, 9, 0),
            ReservationStatus::Upcoming,
        );
        let id = existing.id;
        let pool = vec![existing];

        let overlapping = window(instant(2024, 6, 2, 10, 0), instant(2024, 6, 4, 10, 0));
        let blocking = first_conflict(VehicleId(1), overlapping, &pool, None).unwrap();
        assert_eq!(blocking.id, id);
    }

    #[test]
    fn test_cancelled_reservations_are_ignored() {
        let cancelled = reservation(
            1,
            instant(2024, 6, 1, 9, 0),
            instant(2024, 6, 3, 9, 0),
            ReservationStatus::Cancelled,
        );
        let pool = vec![cancelled];

        let overlapping = window(instant(2024, 6, 2, 10, 0), instant(2024, 6, 4, 10, 0));
        assert!(is_vehicle_available(VehicleId(1), overlapping, &pool, None));
    }

    #[test]
    fn test_other_vehicles_never_conflict() {
        let existing = reservation(
            2,
            instant(2024, 6, 1, 9, 0),
            instant(2024, 6, 3, 9, 0),
            ReservationStatus::Upcoming,
        );
        let pool = vec![existing];

        let overlapping = window(instant(2024, 6, 2, 10, 0), instant(2024, 6, 4, 10, 0));
        assert!(is_vehicle_available(VehicleId(1), overlapping, &pool, None));
    }

    #[test]
    fn test_excluded_id_never_self_conflicts() {
        let existing = reservation(
            1,
            instant(2024, 6, 1, 9, 0),
            instant(2024, 6, 3, 9, 0),
            ReservationStatus::Upcoming,
        );
        let id = existing.id;
        let pool = vec![existing];

        let same_interval = window(instant(2024, 6, 1, 9, 0), instant(2024, 6, 3, 9, 0));
        assert!(is_vehicle_available(VehicleId(1), same_interval, &pool, Some(id)));
        assert!(!is_vehicle_available(VehicleId(1), same_interval, &pool, None));
    }

    #[test]
    fn test_first_conflict_follows_pool_order() {
        let first = reservation(
            1,
            instant(2024, 6, 1, 9, 0),
            instant(2024, 6, 3, 9, 0),
            ReservationStatus::Upcoming,
        );
        let second = reservation(
            1,
            instant(2024, 6, 3, 12, 0),
            instant(2024, 6, 5, 9, 0),
            ReservationStatus::Upcoming,
        );
        let first_id = first.id;
        let pool = vec![first, second];

        // Overlaps both; the earlier pool entry is reported.
        let wide = window(instant(2024, 6, 2, 0, 0), instant(2024, 6, 4, 0, 0));
        assert_eq!(first_conflict(VehicleId(1), wide, &pool, None).unwrap().id, first_id);
    }

    #[test]
    fn test_repeated_checks_are_deterministic() {
        let existing = reservation(
            1,
            instant(2024, 6, 1, 9, 0),
            instant(2024, 6, 3, 9, 0),
            ReservationStatus::Upcoming,
        );
        let pool = vec![existing];
        let w = window(instant(2024, 6, 2, 10, 0), instant(2024, 6, 4, 10, 0));

        let a = first_conflict(VehicleId(1), w, &pool, None).map(|r| r.id);
        let b = first_conflict(VehicleId(1), w, &pool, None).map(|r| r.id);
        assert_eq!(a, b);
    }
}
