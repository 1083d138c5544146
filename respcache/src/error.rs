//! Error types for the response cache.

use thiserror::Error;

/// Fatal errors raised by the interceptor.
///
/// Cache misses, absent content types and empty `Accept` headers are ordinary
/// outcomes and never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The caching policy is misconfigured.
    #[error("invalid cache configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A hook was invoked without a request to inspect.
    ///
    /// Indicates the host pipeline wired the interceptor incorrectly.
    #[error("request context is missing for cache hook")]
    MissingRequestContext,
}

/// Reasons a [`CacheConfiguration`](crate::CacheConfiguration) is rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Server-side time span is zero or negative.
    #[error("server time span must be positive, got {0}s")]
    NonPositiveServerTimeSpan(i64),

    /// Client-side time span is zero or negative.
    #[error("client time span must be positive, got {0}s")]
    NonPositiveClientTimeSpan(i64),
}

/// Error type for cache store operations.
///
/// Store failures never abort a request: the interceptor logs them and lets
/// the request through uncached.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Internal store error, state or computation error.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}
