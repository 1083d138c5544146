//! In-memory [`CacheStore`](respcache::CacheStore) for `respcache`, backed by
//! [Moka](https://docs.rs/moka).
//!
//! ```
//! use respcache::{CacheConfiguration, ResponseCacheInterceptor};
//! use respcache_moka::MokaStore;
//!
//! let interceptor =
//!     ResponseCacheInterceptor::new(CacheConfiguration::default(), MokaStore::shared()).unwrap();
//! # let _ = interceptor;
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
pub mod metrics;
mod store;

pub use builder::MokaStoreBuilder;
pub use store::MokaStore;
