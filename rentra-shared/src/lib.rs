pub mod ids;
pub mod models;
pub mod pii;

pub use ids::{ReservationId, UserId, VehicleId};
pub use pii::Redacted;
