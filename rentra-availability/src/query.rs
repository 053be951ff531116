use crate::conflict::{is_vehicle_available, BookingWindow, WindowError};
use crate::timeparse::compose_instant;
use chrono::{NaiveDate, NaiveTime};
use rentra_booking::Reservation;
use rentra_catalog::Vehicle;

/// Widen an inclusive calendar-date range into a booking window covering the
/// whole of both days: start floored to 00:00:00, end ceiled to
/// 23:59:59.999.
pub fn day_range_window(
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<BookingWindow, WindowError> {
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time");
    BookingWindow::new(
        compose_instant(start_date, NaiveTime::MIN),
        compose_instant(end_date, end_of_day),
    )
}

/// The subset of the catalog with no conflicting reservation anywhere in
/// `window`, preserving catalog order so listings stay deterministic.
///
/// This is deliberately coarser than the exact-time check used at commit
/// time: a partial-day overlap blocks the whole day range.
pub fn available_vehicles<'a>(
    catalog: &'a [Vehicle],
    window: BookingWindow,
    pool: &[Reservation],
) -> Vec<&'a Vehicle> {
    catalog
        .iter()
        .filter(|vehicle| is_vehicle_available(vehicle.id, window, pool, None))
        .collect()
}
