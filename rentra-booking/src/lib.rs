pub mod profile;
pub mod repository;
pub mod reservation;

pub use profile::{DriverLicense, LicenseStatus, ProfilePatch, UserProfile};
pub use repository::{
    DetailsPatch, MirrorCache, NewReservation, ReservationSnapshot, ReservationStore, StoreError,
    UserDirectory,
};
pub use reservation::{BookingTab, HolderContact, Reservation, ReservationStatus};
