//! Metrics declaration and recording.
//!
//! With the `metrics` feature enabled, the interceptor reports:
//!
//! - `respcache_hit_total` - responses served from the store
//! - `respcache_miss_total` - cacheable requests passed to the handler
//! - `respcache_stored_total` - responses captured into the store
//! - `respcache_rejected_total` - cacheable responses refused for storage
//!
//! Without the feature every recorder is a no-op.

use crate::interceptor::{AfterOutcome, BeforeOutcome};

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of cache hit events.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "respcache_hit_total",
            "Total number of responses served from the cache."
        );
        "respcache_hit_total"
    };
    /// Track number of cache miss events.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "respcache_miss_total",
            "Total number of cacheable requests passed to the handler."
        );
        "respcache_miss_total"
    };
    /// Track number of stored responses.
    pub static ref CACHE_STORED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "respcache_stored_total",
            "Total number of responses written to the cache."
        );
        "respcache_stored_total"
    };
    /// Track number of responses refused for storage.
    pub static ref CACHE_REJECTED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "respcache_rejected_total",
            "Total number of cacheable responses not stored because they failed."
        );
        "respcache_rejected_total"
    };
}

/// Record the pre-handler decision.
#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_before(store: &str, outcome: &BeforeOutcome) {
    match outcome {
        BeforeOutcome::HitServed(_) => {
            metrics::counter!(*CACHE_HIT_COUNTER, "store" => store.to_string()).increment(1)
        }
        BeforeOutcome::MissPassthrough(pending) if pending.key().is_some() => {
            metrics::counter!(*CACHE_MISS_COUNTER, "store" => store.to_string()).increment(1)
        }
        BeforeOutcome::MissPassthrough(_) => {}
    }
}

/// Record the pre-handler decision (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn record_before(_store: &str, _outcome: &BeforeOutcome) {}

/// Record the post-handler outcome.
#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_after(store: &str, outcome: AfterOutcome) {
    match outcome {
        AfterOutcome::Stored => {
            metrics::counter!(*CACHE_STORED_COUNTER, "store" => store.to_string()).increment(1)
        }
        AfterOutcome::Rejected => {
            metrics::counter!(*CACHE_REJECTED_COUNTER, "store" => store.to_string()).increment(1)
        }
        AfterOutcome::AlreadyCached | AfterOutcome::NotCacheable => {}
    }
}

/// Record the post-handler outcome (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn record_after(_store: &str, _outcome: AfterOutcome) {}
