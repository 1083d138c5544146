//! Builder for configuring [`MokaStore`].

use std::time::{Duration, Instant};

use chrono::Utc;
use moka::Expiry;
use moka::future::Cache;
use respcache::{CacheKey, CacheValue, CachedResponse};
use smol_str::SmolStr;

use crate::store::MokaStore;

/// Expiration policy that derives each entry's TTL from [`CacheValue::expire`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Expiration;

impl Expiry<CacheKey, CacheValue<CachedResponse>> for Expiration {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CacheValue<CachedResponse>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Self::calculate_ttl(value))
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CacheValue<CachedResponse>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // Moka keeps the old deadline by default; an overwrite must use the new one.
        Some(Self::calculate_ttl(value))
    }
}

impl Expiration {
    fn calculate_ttl(value: &CacheValue<CachedResponse>) -> Duration {
        let millis = (value.expire() - Utc::now()).num_milliseconds();
        if millis <= 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(millis as u64)
        }
    }
}

/// Builder for creating and configuring a [`MokaStore`].
///
/// Entries are bounded by time only: every entry expires at the instant
/// recorded in its [`CacheValue`], and nothing is evicted for space.
///
/// ```
/// use respcache_moka::MokaStore;
///
/// let store = MokaStore::builder()
///     .label("catalog")
///     .initial_capacity(1_024)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct MokaStoreBuilder {
    label: SmolStr,
    initial_capacity: Option<usize>,
}

impl MokaStoreBuilder {
    /// Creates a builder labelled `moka`.
    pub fn new() -> Self {
        Self {
            label: SmolStr::new_static("moka"),
            initial_capacity: None,
        }
    }

    /// Sets the label used in logs and metrics.
    pub fn label(mut self, label: impl Into<SmolStr>) -> Self {
        self.label = label.into();
        self
    }

    /// Pre-allocates room for `capacity` entries.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Builds the store.
    pub fn build(self) -> MokaStore {
        let mut builder = Cache::builder().expire_after(Expiration);
        if let Some(capacity) = self.initial_capacity {
            builder = builder.initial_capacity(capacity);
        }
        MokaStore {
            cache: builder.build(),
            label: self.label,
        }
    }
}

impl Default for MokaStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
