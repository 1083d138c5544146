//! The expiring key-value store behind the interceptor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::key::CacheKey;
use crate::response::CachedResponse;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A thread-safe store whose entries expire after a per-entry TTL.
///
/// Implementations must never return an entry after its expiry, whether or
/// not it has been physically removed yet. Concurrent calls for the same or
/// different keys must not corrupt entries.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the live entry for `key`.
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<CachedResponse>>;

    /// Inserts or overwrites the entry for `key`, expiring `ttl` from now.
    async fn put(&self, key: &CacheKey, value: CachedResponse, ttl: Duration) -> StoreResult<()>;

    /// Whether [`get`](Self::get) would currently return an entry.
    async fn contains(&self, key: &CacheKey) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Atomically inserts `value` unless a live entry exists.
    ///
    /// Returns `true` when this call inserted the value.
    async fn insert_if_absent(
        &self,
        key: &CacheKey,
        value: CachedResponse,
        ttl: Duration,
    ) -> StoreResult<bool>;

    /// Returns the name of this store for logging.
    fn name(&self) -> &str {
        "store"
    }
}

#[async_trait]
impl<T> CacheStore for Arc<T>
where
    T: CacheStore + ?Sized,
{
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<CachedResponse>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &CacheKey, value: CachedResponse, ttl: Duration) -> StoreResult<()> {
        (**self).put(key, value, ttl).await
    }

    async fn contains(&self, key: &CacheKey) -> StoreResult<bool> {
        (**self).contains(key).await
    }

    async fn insert_if_absent(
        &self,
        key: &CacheKey,
        value: CachedResponse,
        ttl: Duration,
    ) -> StoreResult<bool> {
        (**self).insert_if_absent(key, value, ttl).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl CacheStore for Box<dyn CacheStore> {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<CachedResponse>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &CacheKey, value: CachedResponse, ttl: Duration) -> StoreResult<()> {
        (**self).put(key, value, ttl).await
    }

    async fn contains(&self, key: &CacheKey) -> StoreResult<bool> {
        (**self).contains(key).await
    }

    async fn insert_if_absent(
        &self,
        key: &CacheKey,
        value: CachedResponse,
        ttl: Duration,
    ) -> StoreResult<bool> {
        (**self).insert_if_absent(key, value, ttl).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
