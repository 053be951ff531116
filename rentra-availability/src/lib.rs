//! Availability engine: the one place that decides whether a requested
//! pickup/return interval is free for a vehicle.
//!
//! The legacy client re-implemented this check in three screens with
//! drifting edge-case handling; here it is a single pure code path. The
//! engine performs no I/O: callers hand it the candidate reservation pool.

pub mod conflict;
pub mod query;
pub mod timeparse;
pub mod validate;

pub use conflict::{first_conflict, is_vehicle_available, BookingWindow, WindowError};
pub use query::{available_vehicles, day_range_window};
pub use timeparse::{compose_instant, normalize_twelve_hour, parse_twelve_hour};
pub use validate::{validate, Decision, DraftBooking, Rejection};
