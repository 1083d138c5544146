//! Stored values with expiration metadata.
//!
//! A [`CacheValue`] pairs stored data with the absolute instant after which
//! it must no longer be served:
//!
//! ```
//! use respcache::CacheValue;
//! use std::time::Duration;
//!
//! let value = CacheValue::with_ttl("payload", Duration::from_secs(60));
//! assert!(!value.is_expired());
//! assert_eq!(value.data(), &"payload");
//! ```

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Stored data with an absolute expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue<T> {
    data: T,
    expire: DateTime<Utc>,
}

impl<T> CacheValue<T> {
    /// Creates a value expiring at `expire`.
    pub fn new(data: T, expire: DateTime<Utc>) -> Self {
        CacheValue { data, expire }
    }

    /// Creates a value expiring `ttl` from now.
    pub fn with_ttl(data: T, ttl: Duration) -> Self {
        let ttl =
            chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52 * 100));
        let expire = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        CacheValue::new(data, expire)
    }

    /// Returns a reference to the stored data.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns when the data expires.
    #[inline]
    pub fn expire(&self) -> DateTime<Utc> {
        self.expire
    }

    /// Whether the expiry instant has passed.
    pub fn is_expired(&self) -> bool {
        self.expire <= Utc::now()
    }

    /// Remaining lifetime, `None` once expired.
    pub fn ttl(&self) -> Option<Duration> {
        (self.expire - Utc::now())
            .to_std()
            .ok()
            .filter(|ttl| !ttl.is_zero())
    }

    /// Consumes the value and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_expiry_is_expired() {
        let value = CacheValue::new(1u8, Utc::now() - chrono::Duration::seconds(1));
        assert!(value.is_expired());
        assert_eq!(value.ttl(), None);
    }

    #[test]
    fn ttl_counts_down_from_creation() {
        let value = CacheValue::with_ttl((), Duration::from_secs(120));
        let ttl = value.ttl().unwrap();
        assert!(ttl <= Duration::from_secs(120));
        assert!(ttl > Duration::from_secs(118));
    }
}
