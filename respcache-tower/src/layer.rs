use respcache::{CacheConfiguration, CacheError, CacheStore, ResponseCacheInterceptor};
use respcache_moka::MokaStore;
use tower::Layer;

use crate::service::ResponseCacheService;

/// Tower [`Layer`] applying a [`ResponseCacheInterceptor`] to a service.
///
/// All services produced by one layer share its interceptor and store.
pub struct ResponseCache<St> {
    interceptor: ResponseCacheInterceptor<St>,
}

impl<St> Clone for ResponseCache<St> {
    fn clone(&self) -> Self {
        Self {
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<St> ResponseCache<St> {
    /// Wraps an existing interceptor.
    pub fn new(interceptor: ResponseCacheInterceptor<St>) -> Self {
        Self { interceptor }
    }

    /// The interceptor shared by the produced services.
    pub fn interceptor(&self) -> &ResponseCacheInterceptor<St> {
        &self.interceptor
    }
}

impl ResponseCache<MokaStore> {
    /// Creates a builder using the process-wide [`MokaStore::shared`] store
    /// and the default configuration.
    pub fn builder() -> ResponseCacheBuilder<MokaStore> {
        ResponseCacheBuilder::default()
    }
}

impl<S, St> Layer<S> for ResponseCache<St> {
    type Service = ResponseCacheService<S, St>;

    fn layer(&self, inner: S) -> Self::Service {
        ResponseCacheService::new(inner, self.interceptor.clone())
    }
}

/// Builder for [`ResponseCache`].
pub struct ResponseCacheBuilder<St> {
    store: St,
    config: CacheConfiguration,
}

impl<St> ResponseCacheBuilder<St>
where
    St: CacheStore,
{
    /// Replaces the store.
    pub fn store<NSt: CacheStore>(self, store: NSt) -> ResponseCacheBuilder<NSt> {
        ResponseCacheBuilder {
            store,
            config: self.config,
        }
    }

    /// Sets the caching policy.
    pub fn config(self, config: CacheConfiguration) -> Self {
        Self { config, ..self }
    }

    /// Builds the layer, rejecting a misconfigured policy.
    pub fn build(self) -> Result<ResponseCache<St>, CacheError> {
        let interceptor = ResponseCacheInterceptor::new(self.config, self.store)?;
        Ok(ResponseCache { interceptor })
    }
}

impl Default for ResponseCacheBuilder<MokaStore> {
    fn default() -> Self {
        Self {
            store: MokaStore::shared(),
            config: CacheConfiguration::default(),
        }
    }
}
