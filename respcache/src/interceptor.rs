//! The response cache interceptor.
//!
//! A host pipeline calls the interceptor twice per request:
//!
//! ```text
//! before_handler ──► HitServed ──────────────────────────────► response from store
//!        │
//!        └────────► MissPassthrough(Pending) ─► handler ─► after_handler
//!                                                              │
//!                      NotCacheable | Rejected | AlreadyCached | Stored
//! ```
//!
//! The [`Pending`] token returned by the pre-handler hook carries the key used
//! for the lookup into the post-handler hook, so both sides agree on where the
//! response lives.

use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Response, StatusCode};
use http_body::Body as HttpBody;
use tracing::{debug, trace, warn};

use crate::body::{BufferedBody, collect_body};
use crate::config::CacheConfiguration;
use crate::error::CacheError;
use crate::freshness::client_cache_directive;
use crate::key::{CacheKey, build_key};
use crate::metrics;
use crate::policy::is_cacheable;
use crate::request::RequestView;
use crate::response::CachedResponse;
use crate::store::CacheStore;

/// Result of the pre-handler hook.
#[derive(Debug)]
pub enum BeforeOutcome {
    /// A stored response was found. The handler must not run.
    HitServed(Response<Bytes>),
    /// The handler must run. Pass the token to the post-handler hook.
    MissPassthrough(Pending),
}

/// Result of the post-handler hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterOutcome {
    /// The request is not eligible for caching; the response is untouched.
    NotCacheable,
    /// The response was not stored: it was unsuccessful or partial, its body
    /// failed, or the store refused the write.
    Rejected,
    /// A live entry already existed for the key.
    AlreadyCached,
    /// The response was captured into the store.
    Stored,
}

#[derive(Debug, Clone, Default)]
enum PendingState {
    #[default]
    Unknown,
    NotCacheable,
    Key(CacheKey),
}

/// Request-scoped state handed from the pre-handler to the post-handler hook.
///
/// `Pending::default()` carries nothing, in which case the post-handler hook
/// derives cacheability and key from the request again.
#[derive(Debug, Clone, Default)]
pub struct Pending {
    state: PendingState,
}

impl Pending {
    fn not_cacheable() -> Self {
        Self {
            state: PendingState::NotCacheable,
        }
    }

    fn with_key(key: CacheKey) -> Self {
        Self {
            state: PendingState::Key(key),
        }
    }

    /// Key used by the pre-handler lookup, if the request was cacheable.
    pub fn key(&self) -> Option<&CacheKey> {
        match &self.state {
            PendingState::Key(key) => Some(key),
            _ => None,
        }
    }
}

/// Serves stored responses and captures fresh ones.
///
/// One instance is shared by all concurrent requests; cloning is cheap and
/// clones share the same store.
pub struct ResponseCacheInterceptor<S> {
    config: CacheConfiguration,
    store: Arc<S>,
}

impl<S> Clone for ResponseCacheInterceptor<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> std::fmt::Debug for ResponseCacheInterceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCacheInterceptor")
            .field("config", &self.config)
            .field("store", &std::any::type_name::<S>())
            .finish()
    }
}

impl<S> ResponseCacheInterceptor<S>
where
    S: CacheStore,
{
    /// Creates an interceptor owning `store`.
    ///
    /// Fails with [`CacheError::Configuration`] when a time span is not
    /// strictly positive.
    pub fn new(config: CacheConfiguration, store: S) -> Result<Self, CacheError> {
        Self::with_shared_store(config, Arc::new(store))
    }

    /// Creates an interceptor over a store shared with other owners.
    pub fn with_shared_store(
        config: CacheConfiguration,
        store: Arc<S>,
    ) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self { config, store })
    }

    /// The interceptor's configuration.
    pub fn config(&self) -> &CacheConfiguration {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pre-handler hook: serves a stored response when one is live.
    pub async fn before_handler(
        &self,
        request: Option<&RequestView>,
    ) -> Result<BeforeOutcome, CacheError> {
        let request = request.ok_or(CacheError::MissingRequestContext)?;
        let outcome = if is_cacheable(&self.config, request)? {
            let key = build_key(request);
            match self.store.get(&key).await {
                Ok(Some(cached)) => {
                    debug!(%key, status = %cached.status(), "cache hit");
                    let directive = client_cache_directive(&self.config);
                    BeforeOutcome::HitServed(cached.into_response(&key, &directive))
                }
                Ok(None) => {
                    debug!(%key, "cache miss");
                    BeforeOutcome::MissPassthrough(Pending::with_key(key))
                }
                Err(error) => {
                    warn!(%key, store = self.store.name(), %error, "cache lookup failed");
                    BeforeOutcome::MissPassthrough(Pending::with_key(key))
                }
            }
        } else {
            trace!(method = %request.method(), path = request.path(), "request is not cacheable");
            BeforeOutcome::MissPassthrough(Pending::not_cacheable())
        };
        metrics::record_before(self.store.name(), &outcome);
        Ok(outcome)
    }

    /// Post-handler hook: captures a successful response and sets the
    /// client freshness header.
    ///
    /// The body is only drained when the response is about to be stored, and
    /// the store is only touched once the body is complete.
    pub async fn after_handler<B>(
        &self,
        request: Option<&RequestView>,
        pending: Pending,
        response: Response<B>,
    ) -> Result<(Response<BufferedBody<B>>, AfterOutcome), CacheError>
    where
        B: HttpBody,
    {
        let request = request.ok_or(CacheError::MissingRequestContext)?;
        let key = match pending.state {
            PendingState::NotCacheable => {
                return Ok(passthrough(response, AfterOutcome::NotCacheable));
            }
            PendingState::Key(key) => {
                let derived = build_key(request);
                if derived != key {
                    warn!(%key, %derived, "request changed between cache hooks");
                }
                key
            }
            PendingState::Unknown => {
                if !is_cacheable(&self.config, request)? {
                    return Ok(passthrough(response, AfterOutcome::NotCacheable));
                }
                build_key(request)
            }
        };

        let (result, outcome) = self.capture(key, response).await;
        metrics::record_after(self.store.name(), outcome);
        Ok((result, outcome))
    }

    async fn capture<B>(
        &self,
        key: CacheKey,
        response: Response<B>,
    ) -> (Response<BufferedBody<B>>, AfterOutcome)
    where
        B: HttpBody,
    {
        let status = response.status();
        if !status.is_success() || status == StatusCode::PARTIAL_CONTENT {
            debug!(%key, %status, "unsuccessful or partial response is not cached");
            return passthrough(response, AfterOutcome::Rejected);
        }

        let directive = client_cache_directive(&self.config);
        let (mut parts, body) = response.into_parts();

        match self.store.contains(&key).await {
            Ok(true) => {
                trace!(%key, "response already cached");
                directive.apply(&mut parts.headers);
                let response = Response::from_parts(parts, BufferedBody::Passthrough(body));
                return (response, AfterOutcome::AlreadyCached);
            }
            Ok(false) => {}
            Err(error) => {
                warn!(%key, store = self.store.name(), %error, "cache lookup failed");
            }
        }

        let bytes = match collect_body(body).await {
            Ok(bytes) => bytes,
            Err(partial) => {
                warn!(%key, "response body failed, not caching");
                return (Response::from_parts(parts, partial), AfterOutcome::Rejected);
            }
        };

        let content_type = parts.headers.get(CONTENT_TYPE).cloned();
        let cached = CachedResponse::new(parts.status, content_type, bytes.clone());
        let ttl = self.config.server_ttl();
        let outcome = match self.store.insert_if_absent(&key, cached, ttl).await {
            Ok(true) => {
                debug!(%key, ttl = ?ttl, size = bytes.len(), "response stored");
                AfterOutcome::Stored
            }
            Ok(false) => {
                debug!(%key, "response stored by a concurrent request");
                AfterOutcome::AlreadyCached
            }
            Err(error) => {
                warn!(%key, store = self.store.name(), %error, "cache write failed");
                AfterOutcome::Rejected
            }
        };

        directive.apply(&mut parts.headers);
        (
            Response::from_parts(parts, BufferedBody::Complete(Some(bytes))),
            outcome,
        )
    }
}

fn passthrough<B>(
    response: Response<B>,
    outcome: AfterOutcome,
) -> (Response<BufferedBody<B>>, AfterOutcome)
where
    B: HttpBody,
{
    (response.map(BufferedBody::Passthrough), outcome)
}
