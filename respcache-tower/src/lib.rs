//! Tower middleware integration for `respcache`.
//!
//! This crate provides [`ResponseCache`], a Tower [`Layer`] that runs the
//! [`ResponseCacheInterceptor`] hooks around any HTTP service: stored
//! responses are served without calling the service, and successful `GET`
//! responses are captured for the configured time span.
//!
//! # Quick Start
//!
//! ```ignore
//! use respcache::CacheConfiguration;
//! use respcache_tower::ResponseCache;
//! use tower::{ServiceBuilder, service_fn};
//!
//! let cache_layer = ResponseCache::builder()
//!     .config(CacheConfiguration::builder().server_time_span(300).build())
//!     .build()?;
//!
//! let service = ServiceBuilder::new()
//!     .layer(cache_layer)
//!     .service(service_fn(|_req| async {
//!         let body = http_body_util::Full::from("Hello");
//!         Ok::<_, std::convert::Infallible>(http::Response::new(body))
//!     }));
//! ```
//!
//! # Caller Identity
//!
//! With `anonymous_only` set, the layer needs to know who is calling. Place
//! authentication middleware before it and insert an [`Authenticated`]
//! extension into each request; requests without one count as anonymous.
//!
//! # Response Headers
//!
//! Cacheable successful responses, served or captured, get
//! `Cache-Control: max-age=<client_time_span>, must-revalidate`. No other
//! header is touched.
//!
//! [`Layer`]: tower::Layer
//! [`ResponseCacheInterceptor`]: respcache::ResponseCacheInterceptor

#![warn(missing_docs)]

/// Tower layer and builder for cache configuration.
pub mod layer;
/// The Tower service running the cache hooks.
pub mod service;

pub use layer::{ResponseCache, ResponseCacheBuilder};
pub use respcache::{Authenticated, CacheConfiguration};
pub use service::ResponseCacheService;
