//! Response caching for request pipelines.
//!
//! `respcache` sits between a request pipeline and the handler producing a
//! response. Eligible requests are answered from a shared expiring store
//! without running the handler; other cacheable requests run the handler and
//! have its response captured for later. Every cacheable response tells the
//! client how long it may reuse it through `Cache-Control`.
//!
//! # Core Concepts
//!
//! - **[`CacheConfiguration`]**: server TTL, client `max-age` and whether only
//!   anonymous callers are cached.
//! - **[`build_key`]**: derives a [`CacheKey`] from path and `Accept` header.
//! - **[`is_cacheable`]**: only `GET`, and only anonymous callers when
//!   configured so.
//! - **[`client_cache_directive`]**: the `max-age=N, must-revalidate` directive.
//! - **[`CacheStore`]**: the shared expiring store, see `respcache-moka`.
//! - **[`ResponseCacheInterceptor`]**: the pre- and post-handler hooks.
//!
//! # Example
//!
//! ```ignore
//! use respcache::{BeforeOutcome, CacheConfiguration, RequestView, ResponseCacheInterceptor};
//! use respcache_moka::MokaStore;
//!
//! let config = CacheConfiguration::default();
//! let interceptor = ResponseCacheInterceptor::new(config, MokaStore::shared())?;
//!
//! let view = RequestView::from_request(&request);
//! match interceptor.before_handler(Some(&view)).await? {
//!     BeforeOutcome::HitServed(response) => response,
//!     BeforeOutcome::MissPassthrough(pending) => {
//!         let response = handler(request).await;
//!         let (response, _outcome) = interceptor
//!             .after_handler(Some(&view), pending, response)
//!             .await?;
//!         response
//!     }
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `metrics`: hit, miss, stored and rejected counters via the `metrics` crate.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Buffered response bodies.
pub mod body;
/// Interceptor configuration.
pub mod config;
/// Error types.
pub mod error;
/// Client freshness directives.
pub mod freshness;
/// Pre- and post-handler hooks.
pub mod interceptor;
/// Cache key derivation.
pub mod key;
/// Metrics collection for cache observability.
pub mod metrics;
/// Cacheability policy.
pub mod policy;
/// Request projection.
pub mod request;
/// Stored response representation.
pub mod response;
/// Store trait.
pub mod store;
/// Values with expiry metadata.
pub mod value;

pub use body::{BufferedBody, collect_body};
pub use config::{CacheConfiguration, CacheConfigurationBuilder};
pub use error::{CacheError, ConfigurationError, StoreError};
pub use freshness::{ClientCacheDirective, client_cache_directive};
pub use interceptor::{AfterOutcome, BeforeOutcome, Pending, ResponseCacheInterceptor};
pub use key::{CacheKey, KeyPart, build_key};
pub use policy::is_cacheable;
pub use request::{Authenticated, RequestView};
pub use response::CachedResponse;
pub use store::{CacheStore, StoreResult};
pub use value::CacheValue;
