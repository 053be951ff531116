use rentra_api::{app, AppState};
use rentra_booking::MirrorCache;
use rentra_catalog::Fleet;
use rentra_store::{MemoryReservationStore, MemoryUserDirectory, RedisMirrorCache};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentra_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = rentra_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Rentra API on port {}", config.server.port);

    let fleet = Arc::new(Fleet::standard());
    let store = Arc::new(MemoryReservationStore::new(
        config.business_rules.quote_config(),
    ));
    let directory = Arc::new(MemoryUserDirectory::new());

    // Mirror cache is best-effort: a missing Redis leaves live reads intact.
    let mirror: Option<Arc<dyn MirrorCache>> = if config.redis.enabled {
        match RedisMirrorCache::new(&config.redis.url) {
            Ok(cache) => Some(Arc::new(cache)),
            Err(err) => {
                tracing::warn!("Mirror cache disabled, Redis unavailable: {}", err);
                None
            }
        }
    } else {
        None
    };

    if let Some(mirror) = mirror.clone() {
        tokio::spawn(rentra_api::worker::start_mirror_sync(store.clone(), mirror));
    }

    let app_state = AppState {
        store,
        directory,
        mirror,
        fleet,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
