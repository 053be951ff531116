use rentra_booking::{MirrorCache, UserDirectory};
use rentra_catalog::Fleet;
use rentra_store::MemoryReservationStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryReservationStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub mirror: Option<Arc<dyn MirrorCache>>,
    pub fleet: Arc<Fleet>,
}
