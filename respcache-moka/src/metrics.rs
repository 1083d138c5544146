//! Moka store size metrics.
//!
//! Enable the `metrics` feature to report `respcache_moka_entries`, the
//! approximate number of entries held, labelled by store.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Metric name for the entry count gauge.
    pub static ref MOKA_ENTRIES: &'static str = {
        metrics::describe_gauge!(
            "respcache_moka_entries",
            "Approximate number of entries in the Moka store."
        );
        "respcache_moka_entries"
    };
}

/// Record the current entry count for `store`.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_entries(store: &str, entries: u64) {
    metrics::gauge!(*MOKA_ENTRIES, "store" => store.to_string()).set(entries as f64);
}

/// Record the current entry count (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_entries(_store: &str, _entries: u64) {}
