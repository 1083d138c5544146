//! Moka store implementation.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use respcache::{CacheKey, CacheStore, CacheValue, CachedResponse, StoreResult};
use smol_str::SmolStr;
use tracing::trace;

use crate::builder::MokaStoreBuilder;
use crate::metrics;

lazy_static! {
    static ref SHARED: MokaStore = MokaStore::builder().label("shared").build();
}

/// In-memory expiring store powered by Moka.
///
/// `MokaStore` wraps Moka's async cache, which offers lock-free reads and
/// fine-grained locking for writes. Each entry expires at the instant
/// recorded in its [`CacheValue`]; reads check that instant as well, so an
/// entry is never returned after its expiry even if Moka has not purged it
/// yet.
///
/// Clones share the same underlying storage.
///
/// # Caveats
///
/// - Data is **not persisted**: the store is lost on process restart
/// - Data is **not shared** across processes
#[derive(Clone)]
pub struct MokaStore {
    pub(crate) cache: Cache<CacheKey, CacheValue<CachedResponse>>,
    pub(crate) label: SmolStr,
}

impl std::fmt::Debug for MokaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaStore")
            .field("label", &self.label)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl MokaStore {
    /// Creates a new builder for `MokaStore`.
    pub fn builder() -> MokaStoreBuilder {
        MokaStoreBuilder::new()
    }

    /// The process-wide default store.
    ///
    /// Every call returns a handle to the same storage, so interceptors wired
    /// with it share cached responses.
    pub fn shared() -> MokaStore {
        SHARED.clone()
    }

    /// Returns the underlying Moka cache.
    pub fn cache(&self) -> &Cache<CacheKey, CacheValue<CachedResponse>> {
        &self.cache
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &str {
        &self.label
    }

    fn record_entries(&self) {
        metrics::record_entries(&self.label, self.cache.entry_count());
    }
}

#[async_trait]
impl CacheStore for MokaStore {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<CachedResponse>> {
        let value = self
            .cache
            .get(key)
            .await
            .filter(|value| !value.is_expired());
        if let Some(value) = &value {
            trace!(%key, ttl = ?value.ttl(), store = %self.label, "entry found");
        }
        Ok(value.map(CacheValue::into_inner))
    }

    async fn put(&self, key: &CacheKey, value: CachedResponse, ttl: Duration) -> StoreResult<()> {
        self.cache
            .insert(key.clone(), CacheValue::with_ttl(value, ttl))
            .await;
        self.record_entries();
        Ok(())
    }

    async fn insert_if_absent(
        &self,
        key: &CacheKey,
        value: CachedResponse,
        ttl: Duration,
    ) -> StoreResult<bool> {
        let result = self
            .cache
            .entry_by_ref(key)
            .and_compute_with(move |existing| {
                let live = existing.is_some_and(|entry| !entry.value().is_expired());
                let op = if live {
                    Op::Nop
                } else {
                    Op::Put(CacheValue::with_ttl(value, ttl))
                };
                std::future::ready(op)
            })
            .await;
        let inserted = matches!(result, CompResult::Inserted(_) | CompResult::ReplacedWith(_));
        trace!(%key, inserted, store = %self.label, "insert if absent");
        if inserted {
            self.record_entries();
        }
        Ok(inserted)
    }

    fn name(&self) -> &str {
        &self.label
    }
}
