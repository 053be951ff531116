use async_trait::async_trait;
use rentra_booking::{MirrorCache, StoreError};
use redis::AsyncCommands;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

fn unavailable(err: redis::RedisError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// Redis-backed mirror cache. Holds denormalized per-user copies of remote
/// data for offline reads; keys come from the namespaced builders in
/// `rentra_booking::repository`.
#[derive(Clone)]
pub struct RedisMirrorCache {
    client: redis::Client,
}

impl RedisMirrorCache {
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MirrorCache for RedisMirrorCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)?;
        let value: Option<String> = conn.get(key).await.map_err(unavailable)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)?;
        conn.set::<_, _, ()>(key, value).await.map_err(unavailable)?;
        debug!(key, "mirror entry written");
        Ok(())
    }
}

/// In-process mirror cache, used in tests and as a fallback when Redis is
/// disabled.
#[derive(Default)]
pub struct MemoryMirrorCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryMirrorCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MirrorCache for MemoryMirrorCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentra_booking::repository::{bookings_key, favorites_key};
    use rentra_shared::UserId;

    #[tokio::test]
    async fn test_memory_mirror_round_trip() {
        let cache = MemoryMirrorCache::new();
        let user = UserId::new("renter@example.com");

        assert_eq!(cache.get(&bookings_key(&user)).await.unwrap(), None);
        cache.set(&bookings_key(&user), "[]").await.unwrap();
        assert_eq!(
            cache.get(&bookings_key(&user)).await.unwrap().as_deref(),
            Some("[]")
        );
        // Different namespace, different entry.
        assert_eq!(cache.get(&favorites_key(&user)).await.unwrap(), None);
    }
}
