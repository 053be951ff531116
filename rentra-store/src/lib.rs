pub mod app_config;
pub mod doc;
pub mod memory;
pub mod mirror;

pub use memory::{MemoryReservationStore, MemoryUserDirectory};
pub use mirror::{MemoryMirrorCache, RedisMirrorCache};
